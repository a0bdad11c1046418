use std::process::Command;

const LEVEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/sewer.toml");
const CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/director.toml");

fn spawn_director(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_spawn-director"))
        .args(args)
        .output()
        .expect("failed to launch spawn-director")
}

#[test]
fn run_prints_a_summary_for_the_sample_level() {
    let output = spawn_director(&[
        "run", "--level", LEVEL, "--config", CONFIG, "--ticks", "300",
    ]);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ticks: 300 (30.0s simulated)"), "{stdout}");
    assert!(stdout.contains("spawn points: 2 placed, 1 rejected"), "{stdout}");
    assert!(stdout.contains("waypoints: 8 placed, 0 rejected"), "{stdout}");
    assert!(stdout.contains("final census: walkers=6 floaters=3"), "{stdout}");
}

#[test]
fn actor_lifetime_keeps_the_population_cycling() {
    let output = spawn_director(&[
        "run",
        "--level",
        LEVEL,
        "--ticks",
        "300",
        "--seed",
        "11",
        "--actor-lifetime-ticks",
        "40",
    ]);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("retired actors: 0\n"), "{stdout}");
}

#[test]
fn missing_level_fails_with_context() {
    let output = spawn_director(&["run", "--level", "/no/such/level.toml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load level"), "{stderr}");
}

#[test]
fn zero_tick_length_is_refused() {
    let output = spawn_director(&["run", "--level", LEVEL, "--dt-ms", "0"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--dt-ms"));
}
