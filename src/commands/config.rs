//! Configuration commands.
//!
//! ```bash
//! pushsync config                    # dump the effective config as JSON
//! pushsync config api_url            # print one key
//! pushsync config app_id <uuid>      # set and save one key
//! ```

use anyhow::Result;

use crate::config::Config;

/// Run the config command against the loaded configuration.
pub fn run(key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;
    match (key, value) {
        (None, _) => println!("{}", serde_json::to_string_pretty(&config)?),
        (Some(k), None) => println!("{}", get(&config, k)?),
        (Some(k), Some(v)) => {
            config.set_key(k, v)?;
            config.save()?;
            println!("Set {} = {}", k, v);
        }
    }
    Ok(())
}

/// Read a single key as its display string. Unset optional keys print empty.
pub fn get(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "api_url" => config.api_url.clone(),
        "app_id" => config.app_id.clone().unwrap_or_default(),
        "state_file" => config
            .state_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        other => anyhow::bail!("Unknown config key '{other}'"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_keys() {
        let mut config = Config::default();
        config.set_key("app_id", "abc").unwrap();

        assert_eq!(get(&config, "app_id").unwrap(), "abc");
        assert_eq!(get(&config, "state_file").unwrap(), "");
        assert!(get(&config, "api_url").unwrap().starts_with("https://"));
    }

    #[test]
    fn test_get_unknown_key() {
        let err = get(&Config::default(), "token").unwrap_err();
        assert!(err.to_string().contains("token"));
    }
}
