use assert_cmd::Command;

/// The binary with a clean, file-less configuration.
fn folio() -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.env("FOLIO_ENV", "local")
        .env("FOLIO_CONFIG_DIR", "/nonexistent-folio-config")
        .env_remove("MONGODB_URI")
        .env_remove("ADMIN_SECRET")
        .env_remove("CLOUDINARY_CLOUD_NAME")
        .env_remove("CLOUDINARY_API_KEY")
        .env_remove("CLOUDINARY_API_SECRET")
        .env_remove("CLOUDINARY_UNSIGNED_PRESET");
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn check_config_redacts_secrets() {
    let out = stdout(folio().env("ADMIN_SECRET", "hunter2").arg("check-config"));

    assert!(out.contains("admin_secret=set"));
    assert!(out.contains("unconfigured, sample data"));
    assert!(!out.contains("hunter2"));
}

#[test]
fn token_requires_the_admin_secret() {
    folio()
        .env("ADMIN_SECRET", "hunter2")
        .args(["token", "--secret", "guess"])
        .assert()
        .failure();
}

#[test]
fn token_prints_a_jwt() {
    let out = stdout(
        folio()
            .env("ADMIN_SECRET", "hunter2")
            .args(["token", "--secret", "hunter2"]),
    );

    assert_eq!(out.trim().split('.').count(), 3);
}

#[test]
fn shared_secret_mode_is_refused_in_production() {
    folio()
        .env("FOLIO_ENV", "production")
        .env("FOLIO__AUTH__MODE", "shared-secret")
        .arg("check-config")
        .assert()
        .failure();
}
