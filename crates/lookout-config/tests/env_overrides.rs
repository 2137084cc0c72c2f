use figment::Jail;
use lookout_config::LookoutConfig;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("LOOKOUT_GATEWAY__URL", "https://env.example/api.php");
        jail.set_env("LOOKOUT_SOURCES__ADAPTER_TIMEOUT_SECS", "7");

        let config = LookoutConfig::load().expect("config loads");
        assert_eq!(config.gateway.url, "https://env.example/api.php");
        assert_eq!(config.sources.adapter_timeout_secs, 7);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".lookout")?;
        jail.create_file(
            ".lookout/config.toml",
            r#"
[gateway]
url = "https://file.example/api.php"
"#,
        )?;
        jail.set_env("LOOKOUT_GATEWAY__URL", "https://env.example/api.php");

        let config = LookoutConfig::load().expect("config loads");
        assert_eq!(config.gateway.url, "https://env.example/api.php");
        Ok(())
    });
}
