use cardtable_cli::config::{AI_ENV, CONFIG_ENV, GAMES_ENV, SEED_ENV};
use cardtable_cli::run;
use serde_json::Value;
use serial_test::serial;

fn clear_env() {
    for key in [CONFIG_ENV, SEED_ENV, AI_ENV, GAMES_ENV] {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn cfg_json() -> Value {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["cardtable", "cfg"], &mut out, &mut err);
    assert_eq!(code, 0, "{}", String::from_utf8_lossy(&err));
    serde_json::from_slice(&out).unwrap()
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    clear_env();
    let json = cfg_json();
    assert_eq!(json["seed"]["value"], Value::Null);
    assert_eq!(json["seed"]["source"], "default");
    assert_eq!(json["ai"]["value"], "spades");
    assert_eq!(json["games"]["value"], 1);
    assert_eq!(json["players"]["value"][0], "p1");
}

#[test]
#[serial]
fn env_over_file_over_default() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("cardtable.toml");
    std::fs::write(
        &cfg_path,
        "seed = 456\nai = \"random\"\nplayers = [\"north\", \"east\", \"south\", \"west\"]\n",
    )
    .unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg_path);
    }

    let json = cfg_json();
    assert_eq!(json["seed"]["value"], 456);
    assert_eq!(json["seed"]["source"], "file");
    assert_eq!(json["ai"]["source"], "file");
    assert_eq!(json["games"]["source"], "default");
    assert_eq!(json["players"]["value"][3], "west");

    unsafe {
        std::env::set_var(SEED_ENV, "789");
        std::env::set_var(GAMES_ENV, "3");
    }
    let json = cfg_json();
    assert_eq!(json["seed"]["value"], 789);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["games"]["value"], 3);
    assert_eq!(json["games"]["source"], "env");
    assert_eq!(json["ai"]["value"], "random");

    // Configured seats and seed drive the deal.
    let mut out = Vec::new();
    let code = run(["cardtable", "deal"], &mut out, &mut Vec::new());
    clear_env();
    assert_eq!(code, 0);
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Seed: 789\n"));
    assert!(out.contains("\nnorth: "));
    assert!(out.contains("Turn: north"));
}

#[test]
#[serial]
fn invalid_file_is_a_config_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("cardtable.toml");
    std::fs::write(&cfg_path, "players = [\"a\", \"b\"]\n").unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg_path);
    }

    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["cardtable", "cfg"], &mut out, &mut err);
    clear_env();

    assert_eq!(code, 2);
    assert!(out.is_empty());
    let err = String::from_utf8(err).unwrap();
    assert!(err.contains("players must name 4 seats"), "{}", err);
}

#[test]
#[serial]
fn sim_flags_override_config() {
    clear_env();
    unsafe {
        std::env::set_var(AI_ENV, "random");
        std::env::set_var(GAMES_ENV, "5");
    }
    let mut out = Vec::new();
    let code = run(
        ["cardtable", "sim", "--games", "1", "--seed", "3", "--ai", "spades"],
        &mut out,
        &mut Vec::new(),
    );
    clear_env();
    assert_eq!(code, 0);
    assert!(String::from_utf8(out).unwrap().contains("Simulated: 1 games (ai=spades)"));
}
