// Integration tests for octurdle
// These tests drive the service boundary the way a request handler would

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use octurdle::cli::CliInterface;
use octurdle::scorer::codes;
use octurdle::*;
use std::io::Cursor;

fn config() -> Config {
    Config {
        token_secret: Some("integration-secret".to_string()),
        bcrypt_cost: 4,
        ..Config::default()
    }
}

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::days(n)
}

#[test]
fn test_daily_word_shared_across_service_instances() {
    // Two processes with the same list agree on the word for a date.
    let a = GameService::new(&config(), load_word_list(None).unwrap(), UserStore::in_memory()).unwrap();
    let b = GameService::new(&config(), load_word_list(None).unwrap(), UserStore::in_memory()).unwrap();
    for n in 0..10 {
        assert_eq!(a.today(day(n)).unwrap().word, b.today(day(n)).unwrap().word);
    }
}

#[test]
fn test_today_matches_select_word() {
    let words = load_word_list(None).unwrap();
    let service = GameService::new(&config(), words.clone(), UserStore::in_memory()).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let expected = select_word(date, &words, &ChaChaSource).unwrap();
    assert_eq!(service.today(day(0)).unwrap().word, expected);

    let secret = service.today(day(0)).unwrap().word;
    let feedback = service.feedback(&secret.to_lowercase(), day(0)).unwrap();
    assert_eq!(codes(&feedback), vec![1; 8]);
}

#[test]
fn test_streak_across_days_through_service() {
    let service = GameService::new(
        &config(),
        WordList::new(vec!["ABCDEFGH".to_string()]).unwrap(),
        UserStore::in_memory(),
    )
    .unwrap();
    service.register("tester", "password123", day(0)).unwrap();

    let record = |n: i64, won: bool| {
        let token = service.login("tester", "password123", day(n)).unwrap().token;
        service.record_result(&token, won, day(n))
    };

    assert_eq!(record(0, true).unwrap().current_streak, 1);
    assert!(matches!(record(0, true), Err(Error::AlreadyUpdated)));
    assert_eq!(record(1, false).unwrap().current_streak, 2);
    assert_eq!(record(3, true).unwrap().current_streak, 3);
    let stats = record(7, true).unwrap();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.played_games, 4);
    assert_eq!(stats.won_games, 3);
}

#[test]
fn test_stats_persist_in_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_path: Some(dir.path().join("users.json")),
        ..config()
    };

    let token = {
        let service = GameService::from_config(&config).unwrap();
        service.register("tester", "password123", day(0)).unwrap();
        let token = service.login("tester", "password123", day(0)).unwrap().token;
        service.record_result(&token, true, day(0)).unwrap();
        token
    };

    // A restarted process still refuses a second result for the same day.
    let service = GameService::from_config(&config).unwrap();
    assert!(matches!(
        service.record_result(&token, true, day(0) + Duration::hours(3)),
        Err(Error::AlreadyUpdated)
    ));
    let stats = service.stats(&token, day(0)).unwrap();
    assert_eq!((stats.played_games, stats.won_games, stats.current_streak), (1, 1, 1));

    let raw = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
    assert!(raw.contains("\"playedGames\": 1"));
    assert!(raw.contains("\"currentStreak\": 1"));
    assert!(!raw.contains("password123"));
}

#[test]
fn test_custom_word_list_file() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("words.txt");
    std::fs::write(&list, "abcdefgh\n").unwrap();
    let config = Config {
        word_list_path: Some(list),
        ..config()
    };
    let service = GameService::from_config(&config).unwrap();
    assert_eq!(service.today(day(0)).unwrap().word, "ABCDEFGH");
}

#[test]
fn test_empty_word_list_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("words.txt");
    std::fs::write(&list, "\n").unwrap();
    let config = Config {
        word_list_path: Some(list),
        ..config()
    };
    assert!(matches!(
        GameService::from_config(&config),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_interactive_round_over_cli_interface() {
    let service = GameService::new(
        &config(),
        WordList::new(vec!["ABCDEFGH".to_string()]).unwrap(),
        UserStore::in_memory(),
    )
    .unwrap();
    let input = "crane\nzzzzzzzz\nhgfedcba\nabcdefgh\n";
    let mut interface = CliInterface::new(Cursor::new(input), Vec::new());

    let outcome = game_loop(&service, &mut interface, day(0)).unwrap();
    assert_eq!(outcome, GameOutcome::Won { attempts: 3 });

    let output = String::from_utf8(interface.into_output()).unwrap();
    assert!(output.contains("Invalid guess. Please enter 8 letters."));
    assert!(output.contains("1/6  ZZZZZZZZ  XXXXXXXX"));
    assert!(output.contains("2/6  HGFEDCBA  YYYYYYYY"));
    assert!(output.contains("3/6  ABCDEFGH  GGGGGGGG"));
    assert!(output.contains("Solved in 3!"));
}

#[test]
fn test_word_rolls_over_with_configured_zone() {
    let words = load_word_list(None).unwrap();
    let tokyo = Config {
        zone: chrono::FixedOffset::east_opt(9 * 3600).unwrap(),
        ..config()
    };
    let service = GameService::new(&tokyo, words.clone(), UserStore::in_memory()).unwrap();

    // 16:00 UTC on March 1 is already March 2 in Tokyo.
    let instant = Utc.with_ymd_and_hms(2024, 3, 1, 16, 0, 0).unwrap();
    let puzzle = service.today(instant).unwrap();
    assert_eq!(puzzle.seed, 20_240_302);
    let expected = select_word(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), &words, &ChaChaSource).unwrap();
    assert_eq!(puzzle.word, expected);
}
