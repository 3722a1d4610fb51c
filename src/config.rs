use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub headers: bool,
    pub strip_comments: bool,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headers: true,
            strip_comments: true,
            log_level: LevelFilter::Warn,
            log_file: None,
        }
    }
}

impl Config {
    pub fn load() -> figment::error::Result<Config> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        for path in vec![global_config_path(), local_config_path()]
            .into_iter()
            .flatten()
        {
            figment = figment.merge(Yaml::file(path));
        }

        figment.merge(Env::prefixed("SCHEMECAT_")).extract()
    }

    pub fn help() {
        println!("schemecat configuration:");
        println!(
            "  system config path: {}",
            global_config_path()
                .and_then(|v| Some(v.to_str()?.to_string()))
                .unwrap_or_else(|| "none".to_string())
        );
        println!(
            "  user config path:   {}",
            local_config_path()
                .and_then(|v| Some(v.to_str()?.to_string()))
                .unwrap_or_else(|| "none".to_string())
        );
        println!();
        println!("Current configuration:");
        match Config::load() {
            Ok(c) => c.show(),
            Err(e) => println!("  ERROR: {e}"),
        }
        println!();
    }

    fn show(&self) {
        match serde_yaml::to_string(self) {
            Ok(yaml) => println!("{yaml}"),
            Err(e) => println!("  ERROR: {e}"),
        }
    }
}

fn local_config_path() -> Option<PathBuf> {
    let dirs = directories::BaseDirs::new()?;
    Some(dirs.config_dir().join("schemecat").join("schemecat.conf"))
}

#[cfg(windows)]
fn global_config_path() -> Option<PathBuf> {
    use std::env;

    Some(
        PathBuf::from(env::var("ProgramData").ok()?)
            .join("schemecat")
            .join("schemecat.conf"),
    )
}

#[cfg(unix)]
fn global_config_path() -> Option<PathBuf> {
    Some(PathBuf::from("/etc").join("schemecat").join("schemecat.conf"))
}
