use std::env;

use clap::Parser;
use kaia_investors::args::{Arguments, Command, OutputFormat};
use serial_test::serial;

fn set_env(vars: &[(&str, &str)]) {
    for (key, value) in vars {
        // SAFETY: tests touching the environment run serially
        unsafe { env::set_var(key, value) };
    }
}

fn remove_env(keys: &[&str]) {
    for key in keys {
        // SAFETY: tests touching the environment run serially
        unsafe { env::remove_var(key) };
    }
}

#[test]
#[serial]
fn it_reads_settings_from_environment() {
    set_env(&[
        ("KAIA_BASE_URL", "http://localhost:3000/"),
        ("KAIA_OUTPUT", "json"),
        ("KAIA_TIMEOUT", "250"),
    ]);

    let args = Arguments::try_parse_from(["kaia-investors", "list"]);
    remove_env(&["KAIA_BASE_URL", "KAIA_OUTPUT", "KAIA_TIMEOUT"]);
    let args = args.unwrap();

    assert_eq!(args.command(), Command::List);
    assert_eq!(args.server(), "http://localhost:3000");
    assert_eq!(args.output(), OutputFormat::Json);
    assert_eq!(args.timeout(), 250);
}

#[test]
#[serial]
fn it_prefers_flags_over_environment() {
    set_env(&[("KAIA_TOKEN", "from-env")]);

    let args = Arguments::try_parse_from(["kaia-investors", "--token", "from-flag", "logout"]);
    remove_env(&["KAIA_TOKEN"]);
    let args = args.unwrap();

    assert_eq!(args.token.as_deref(), Some("from-flag"));
    assert_eq!(args.command(), Command::Logout);
}
