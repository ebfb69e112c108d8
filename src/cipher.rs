//! Substitution cipher over the lowercase ASCII alphabet.
//!
//! The permutation is derived once from a fixed seed and kept in an
//! immutable [`CipherTable`] that callers pass around by reference.
use std::fmt;

use anyhow::{Result, bail};
use rand_mt::Mt;

/// Seed the permutation is derived from.
///
/// Changing it makes every saved note undecodable.
pub const SEED: u32 = 1234;

/// The ordered alphabet being permuted.
pub const ALPHABET: &[u8; ALPHABET_LEN] = b"abcdefghijklmnopqrstuvwxyz";

/// Number of letters in [`ALPHABET`].
pub const ALPHABET_LEN: usize = 26;

/// Direction of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode
{
    /// Plain text to cipher text
    #[default]
    Encrypt,
    /// Cipher text to plain text
    Decrypt,
}

impl Mode
{
    /// Label written in front of saved note entries.
    #[must_use]
    pub const fn label(self) -> &'static str
    {
        match self
        {
            Self::Encrypt => "ENCRYPTED",
            Self::Decrypt => "DECRYPTED",
        }
    }

    /// Parses a note entry label back into a mode.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self>
    {
        match label
        {
            "ENCRYPTED" => Some(Self::Encrypt),
            "DECRYPTED" => Some(Self::Decrypt),
            _ => None,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self
    {
        match self
        {
            Self::Encrypt => Self::Decrypt,
            Self::Decrypt => Self::Encrypt,
        }
    }
}

impl fmt::Display for Mode
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            Self::Encrypt => formatter.write_str("Encrypt"),
            Self::Decrypt => formatter.write_str("Decrypt"),
        }
    }
}

/// Forward and inverse lookup tables of the substitution.
///
/// Both tables are indexed by `letter - b'a'` and hold the substituted
/// letter as an ASCII byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherTable
{
    /// Plain letter to cipher letter
    forward: [u8; ALPHABET_LEN],
    /// Cipher letter to plain letter
    inverse: [u8; ALPHABET_LEN],
}

impl CipherTable
{
    /// Builds the table from [`SEED`].
    ///
    /// The alphabet is shuffled with a backwards Fisher-Yates walk driven by
    /// MT19937 seeded through `init_by_array`. Each swap index is drawn by
    /// rejection sampling on the top bits of a 32-bit output, so the result
    /// is reproducible across runs and platforms.
    ///
    /// # Returns
    ///
    /// The cipher table for the fixed seed.
    #[must_use]
    pub fn new() -> Self
    {
        let mut rng = Mt::new_with_key([SEED]);
        let mut shuffled = *ALPHABET;

        for index in (1..ALPHABET_LEN).rev()
        {
            // index < 26, the conversions cannot fail
            let bound = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let pick = usize::try_from(random_below(&mut rng, bound)).unwrap_or(0);
            shuffled.swap(index, pick);
        }

        Self::from_permutation(shuffled)
    }

    /// Builds a table from an explicit shuffled alphabet.
    ///
    /// # Arguments
    ///
    /// * `shuffled` - The image of `a..=z`, in alphabet order
    ///
    /// # Errors
    ///
    /// Returns an error if `shuffled` is not a permutation of the lowercase
    /// alphabet.
    pub fn from_shuffled(shuffled: &str) -> Result<Self>
    {
        let bytes = shuffled.as_bytes();
        if bytes.len() != ALPHABET_LEN
        {
            bail!(
                "Expected {ALPHABET_LEN} letters, got {}",
                shuffled.chars().count()
            );
        }

        let mut seen = [false; ALPHABET_LEN];
        let mut permutation = [0_u8; ALPHABET_LEN];
        for (slot, &byte) in permutation.iter_mut().zip(bytes)
        {
            if !byte.is_ascii_lowercase()
            {
                bail!("Invalid letter {:?} in cipher alphabet", char::from(byte));
            }
            let offset = letter_offset(byte);
            if seen[offset]
            {
                bail!("Letter {:?} appears twice in cipher alphabet", char::from(byte));
            }
            seen[offset] = true;
            *slot = byte;
        }

        Ok(Self::from_permutation(permutation))
    }

    /// Zips the alphabet with its image and inverts the result.
    fn from_permutation(forward: [u8; ALPHABET_LEN]) -> Self
    {
        let mut inverse = *ALPHABET;
        for (&plain, &cipher) in ALPHABET.iter().zip(&forward)
        {
            inverse[letter_offset(cipher)] = plain;
        }

        Self { forward, inverse }
    }

    /// The shuffled alphabet, i.e. the images of `a..=z` in order.
    #[must_use]
    pub fn shuffled(&self) -> String
    {
        self.forward
            .iter()
            .map(|&byte| char::from(byte))
            .collect()
    }

    /// Maps one character through the forward table.
    ///
    /// Characters outside `a..=z` are returned unchanged.
    #[must_use]
    pub fn encrypt_char(&self, ch: char) -> char
    {
        lookup(&self.forward, ch)
    }

    /// Maps one character through the inverse table.
    ///
    /// Characters outside `a..=z` are returned unchanged.
    #[must_use]
    pub fn decrypt_char(&self, ch: char) -> char
    {
        lookup(&self.inverse, ch)
    }

    /// Encrypts `text`.
    ///
    /// The whole input is lowercased first, so case does not survive a
    /// round trip.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to encrypt
    ///
    /// # Returns
    ///
    /// The cipher text.
    #[must_use]
    pub fn encrypt(&self, text: &str) -> String
    {
        substitute(&self.forward, text)
    }

    /// Decrypts `text`.
    ///
    /// # Arguments
    ///
    /// * `text` - The cipher text
    ///
    /// # Returns
    ///
    /// The lowercased plain text.
    #[must_use]
    pub fn decrypt(&self, text: &str) -> String
    {
        substitute(&self.inverse, text)
    }

    /// Runs the transform for `mode`.
    #[must_use]
    pub fn apply(&self, mode: Mode, text: &str) -> String
    {
        match mode
        {
            Mode::Encrypt => self.encrypt(text),
            Mode::Decrypt => self.decrypt(text),
        }
    }
}

impl Default for CipherTable
{
    fn default() -> Self
    {
        Self::new()
    }
}

/// Draws a value in `0..bound` from the top bits of the generator.
///
/// Out of range draws are rejected and redrawn.
fn random_below(rng: &mut Mt, bound: u32) -> u32
{
    let bits = u32::BITS - bound.leading_zeros();
    loop
    {
        let candidate = rng.next_u32() >> (u32::BITS - bits);
        if candidate < bound
        {
            return candidate;
        }
    }
}

/// Position of a lowercase ASCII letter in the alphabet.
fn letter_offset(byte: u8) -> usize
{
    usize::from(byte.wrapping_sub(b'a'))
}

/// Looks `ch` up in `table`, falling back to `ch` itself.
fn lookup(table: &[u8; ALPHABET_LEN], ch: char) -> char
{
    u8::try_from(ch)
        .ok()
        .filter(u8::is_ascii_lowercase)
        .and_then(|byte| table.get(letter_offset(byte)))
        .map_or(ch, |&byte| char::from(byte))
}

/// Lowercases `text` and maps every character through `table`.
fn substitute(table: &[u8; ALPHABET_LEN], text: &str) -> String
{
    text.to_lowercase()
        .chars()
        .map(|ch| lookup(table, ch))
        .collect()
}
