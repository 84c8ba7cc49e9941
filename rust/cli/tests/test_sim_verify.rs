use cardtable_cli::run;
use cardtable_engine::logger::GameRecord;
use serial_test::serial;
use std::io::Write;

fn run_args(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(args, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

fn simulate(path: &str, games: &str, seed: &str) {
    let (code, out, err) = run_args(&[
        "cardtable", "sim", "--games", games, "--seed", seed, "--output", path,
    ]);
    assert_eq!(code, 0, "{}", err);
    assert!(out.contains(&format!("Simulated: {} games", games)));
}

#[test]
#[serial]
fn simulated_games_verify_and_replay() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    let path = path.to_str().unwrap();
    simulate(path, "4", "2024");

    let (code, out, err) = run_args(&["cardtable", "verify", "--input", path]);
    assert_eq!(code, 0, "{}", err);
    assert!(out.contains("Verify: OK (games=4)"));

    let (code, out, _) = run_args(&["cardtable", "replay", "--input", path]);
    assert_eq!(code, 0);
    assert_eq!(out.matches("Winner: ").count(), 4);
    assert!(out.contains("Replayed: 4 of 4 games"));
}

#[test]
#[serial]
fn tampered_record_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    let path_str = path.to_str().unwrap();
    simulate(path_str, "2", "5");

    let content = std::fs::read_to_string(&path).unwrap();
    let mut records: Vec<GameRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    // Swapping two plays breaks legality even when both cards exist.
    records[1].actions.swap(10, 11);

    let mut file = std::fs::File::create(&path).unwrap();
    for r in &records {
        writeln!(file, "{}", serde_json::to_string(r).unwrap()).unwrap();
    }
    drop(file);

    let (code, out, err) = run_args(&["cardtable", "verify", "--input", path_str]);
    assert_eq!(code, 2);
    assert!(out.contains("Verify: FAIL (games=2)"));
    assert!(err.contains("Line 2: Action 10 rejected"), "{}", err);
    assert!(err.contains("Invalid games: 1 of 2"));
}

#[test]
#[serial]
fn seeded_runs_write_identical_games() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    simulate(a.to_str().unwrap(), "2", "31");
    simulate(b.to_str().unwrap(), "2", "31");

    let load = |p: &std::path::Path| -> Vec<GameRecord> {
        std::fs::read_to_string(p)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    };
    let (ra, rb) = (load(&a), load(&b));
    assert_eq!(ra.len(), 2);
    for (x, y) in ra.iter().zip(&rb) {
        assert_eq!(x.actions, y.actions);
        assert_eq!(x.winner, y.winner);
        assert_eq!(x.tricks_won, y.tricks_won);
    }
}
