use std::fs;

use chrono::NaiveDate;
use cipher_notes::{AppPaths, CipherTable, Mode, NoteEntry, NoteStore, PreferenceStore};

#[test]
fn saved_cipher_text_decodes_after_reload()
{
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::in_dir(dir.path());
    paths.ensure_dirs().unwrap();

    let cipher = CipherTable::new();
    let store = NoteStore::new(paths.notes_file());
    let timestamp = NaiveDate::from_ymd_opt(2023, 11, 30)
        .and_then(|date| date.and_hms_opt(23, 59, 0))
        .unwrap();

    let secret = cipher.encrypt("Meet at the bridge, 9pm");
    store
        .append_entry(&NoteEntry::new(Mode::Encrypt, timestamp, &secret))
        .unwrap();

    // A fresh table stands in for a later run of the program.
    let later = CipherTable::new();
    let lines = NoteStore::new(paths.notes_file())
        .load()
        .unwrap();
    let entry = NoteEntry::parse(&lines[0]).unwrap();

    assert_eq!(entry.mode, Mode::Encrypt);
    assert_eq!(entry.timestamp, timestamp);
    assert_eq!(later.decrypt(&entry.text), "meet at the bridge, 9pm");
}

#[test]
fn existing_note_file_is_readable()
{
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::in_dir(dir.path());
    fs::write(
        paths.notes_file(),
        "ENCRYPTED [2024-05-01 10:00:00]: ignnw awxnk!\nDECRYPTED [2024-05-01 10:01:00]: hello \
         world!\n",
    )
    .unwrap();

    let cipher = CipherTable::new();
    let lines = NoteStore::new(paths.notes_file())
        .load()
        .unwrap();
    let decoded: Vec<String> = lines
        .iter()
        .filter_map(|line| NoteEntry::parse(line))
        .map(|entry| cipher.apply(entry.mode.toggled(), &entry.text))
        .collect();

    assert_eq!(decoded, vec!["hello world!".to_string(), "ignnw awxnk!".to_string()]);
}

#[test]
fn deleting_keeps_the_remaining_order()
{
    let dir = tempfile::tempdir().unwrap();
    let store = NoteStore::new(AppPaths::in_dir(dir.path()).notes_file());
    let lines: Vec<String> = (1..=5)
        .map(|number| format!("ENCRYPTED [2024-05-01 10:00:0{number}]: note {number}"))
        .collect();
    store.rewrite(&lines).unwrap();

    assert_eq!(store.delete(0).unwrap().as_ref(), Some(&lines[0]));
    assert_eq!(store.delete(3).unwrap().as_ref(), Some(&lines[4]));
    assert_eq!(store.load().unwrap(), lines[1..4].to_vec());
}

#[test]
fn theme_preference_survives_a_restart()
{
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::in_dir(dir.path());

    let prefs = PreferenceStore::new(paths.theme_file());
    assert!(prefs.load().dark_mode);

    prefs.save(prefs.load().toggled()).unwrap();
    assert!(!PreferenceStore::new(paths.theme_file()).load().dark_mode);

    fs::write(paths.theme_file(), "not json at all").unwrap();
    assert!(PreferenceStore::new(paths.theme_file()).load().dark_mode);
}
