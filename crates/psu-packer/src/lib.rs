use chrono::NaiveDateTime;
use colored::Colorize;
use psu_format::{PSUFile, PSUWriter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "psu.toml";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub name: String,
    pub timestamp: Option<NaiveDateTime>,
    pub exclude: Option<Vec<String>>,
    pub quiet: bool,
}

mod date_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_some(&value.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserialize: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserialize)?;
        if let Some(s) = s {
            Ok(Some(
                NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)?,
            ))
        } else {
            Ok(None)
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct ConfigFile {
    config: ConfigSection,
}

#[derive(Debug, Deserialize, Serialize)]
struct ConfigSection {
    name: String,
    #[serde(default, with = "date_format", skip_serializing_if = "Option::is_none")]
    timestamp: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    quiet: bool,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let ConfigSection {
            name,
            timestamp,
            exclude,
            quiet,
        } = file.config;
        Self {
            name,
            timestamp,
            exclude,
            quiet,
        }
    }
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_toml_str(str: &str) -> Result<Self, Error> {
        let config_file =
            toml::from_str::<ConfigFile>(str).map_err(|e| Error::ConfigError(e.to_string()))?;
        Ok(config_file.into())
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        let config_file = ConfigFile {
            config: ConfigSection {
                name: self.name.clone(),
                timestamp: self.timestamp,
                exclude: self.exclude.clone(),
                quiet: self.quiet,
            },
        };

        toml::to_string_pretty(&config_file)
    }
}

/// Reads `psu.toml` from `folder`.
pub fn load_config(folder: &Path) -> Result<Config, Error> {
    let str = std::fs::read_to_string(folder.join(CONFIG_FILE_NAME))?;
    Config::from_toml_str(&str)
}

/// Encodes `files` into `sink` as configured by `cfg`.
///
/// The configuration file itself and any excluded names are left out. A
/// configured timestamp replaces every entry's times, including the files'.
pub fn pack_with_config<W: Write + ?Sized>(
    sink: &mut W,
    files: Vec<PSUFile>,
    cfg: Config,
) -> Result<(), Error> {
    let Config {
        name,
        timestamp,
        exclude,
        quiet,
    } = cfg;

    if !check_name(&name) {
        return Err(Error::NameError);
    }

    let exclude_set: HashSet<String> = exclude.unwrap_or_default().into_iter().collect();
    let mut files = filter_files(files, &exclude_set, quiet);

    if let Some(timestamp) = timestamp {
        let timestamp = timestamp.and_utc();
        for file in files.iter_mut() {
            file.created = timestamp;
            file.modified = timestamp;
        }
    }

    if !quiet {
        for file in &files {
            println!("+ {} {}", "Adding", file.name.green());
        }
    }

    let mut writer = PSUWriter::new(&name, &files);
    if let Some(timestamp) = timestamp {
        writer = writer.with_timestamp(timestamp);
    }
    writer.write_to(sink)?;

    Ok(())
}

/// Packs into a newly created file at `output`.
pub fn pack_to_file(output: &Path, files: Vec<PSUFile>, cfg: Config) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(output)?);
    pack_with_config(&mut writer, files, cfg)?;
    writer.flush()?;
    Ok(())
}

fn check_name(name: &str) -> bool {
    name.chars()
        .all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | ' '))
}

fn filter_files(files: Vec<PSUFile>, exclude: &HashSet<String>, quiet: bool) -> Vec<PSUFile> {
    files
        .into_iter()
        .filter(|f| {
            let skip = if f.name.eq_ignore_ascii_case(CONFIG_FILE_NAME) {
                Some("is the packer configuration, skipping")
            } else if exclude.contains(&f.name) {
                Some("is excluded, skipping")
            } else {
                None
            };

            if let (Some(reason), false) = (skip, quiet) {
                eprintln!("{} {} {}", "File".dimmed(), f.name.dimmed(), reason.dimmed());
            }
            skip.is_none()
        })
        .collect()
}

#[derive(Debug)]
pub enum Error {
    NameError,
    IOError(std::io::Error),
    ConfigError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NameError => write!(f, "Name must match [a-zA-Z0-9._-\\s]+"),
            Error::IOError(err) => write!(f, "{err}"),
            Error::ConfigError(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IOError(err)
    }
}
