use std::path::PathBuf;

use crate::{
    disk::SizeUnit,
    error::{DiskError, Result},
    shell::command::{Command, FdiskParams, MkdiskParams},
};

/// Parameter prefix, as in `->size=10`.
pub const PARAM_PREFIX: &str = "->";

/// Parses one line. Blank lines and `#` comments give `Ok(None)`.
pub fn parse_command(input: &str) -> Result<Option<Command>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    let cmd = tokens[0].to_ascii_uppercase();
    let params = parse_params(&tokens[1..])?;

    let command = match cmd.as_str() {
        "HELP" => Command::Help,
        "CLEAR" => Command::Clear,
        "EXIT" | "QUIT" => Command::Exit,
        "REP" => Command::Rep,
        "EXECUTE" => {
            let path = required(&params, "path")?;
            Command::Execute(PathBuf::from(path))
        }
        "MKDISK" => Command::Mkdisk(mkdisk_params(&params)?),
        "FDISK" => Command::Fdisk(fdisk_params(&params)?),
        _ => return Err(DiskError::UnknownCommand(tokens[0].to_string())),
    };

    Ok(Some(command))
}

/// `->key=value` tokens, keys lower-cased and quotes stripped from values.
/// A repeated key keeps its last value.
fn parse_params(tokens: &[&str]) -> Result<Vec<(String, String)>> {
    let mut params: Vec<(String, String)> = Vec::new();

    for token in tokens {
        let body = token.strip_prefix(PARAM_PREFIX).ok_or_else(|| {
            DiskError::InvalidParameter(format!("expected ->key=value, got '{}'", token))
        })?;
        let (key, value) = body.split_once('=').ok_or_else(|| {
            DiskError::InvalidParameter(format!("parameter '{}' has no value", token))
        })?;

        let key = key.to_ascii_lowercase();
        let value = value.trim_matches(|c| c == '"' || c == '\'').to_string();

        match params.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => params.push((key, value)),
        }
    }

    Ok(params)
}

fn lookup<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn required<'a>(params: &'a [(String, String)], key: &str) -> Result<&'a str> {
    lookup(params, key).filter(|v| !v.is_empty()).ok_or_else(|| {
        DiskError::InvalidParameter(format!("missing required parameter '{}'", key))
    })
}

fn reject_unknown(params: &[(String, String)], allowed: &[&str]) -> Result<()> {
    match params.iter().find(|(k, _)| !allowed.contains(&k.as_str())) {
        Some((key, _)) => Err(DiskError::InvalidParameter(format!(
            "unknown parameter '{}'",
            key
        ))),
        None => Ok(()),
    }
}

fn parse_size(params: &[(String, String)]) -> Result<i64> {
    let raw = required(params, "size")?;
    match raw.parse::<i64>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(DiskError::InvalidParameter(format!(
            "size must be a positive integer, got '{}'",
            raw
        ))),
    }
}

fn parse_unit(
    params: &[(String, String)],
    default: SizeUnit,
    allowed: &[SizeUnit],
) -> Result<SizeUnit> {
    let unit = match lookup(params, "unit") {
        Some(raw) => raw.parse::<SizeUnit>()?,
        None => default,
    };
    if !allowed.contains(&unit) {
        return Err(DiskError::InvalidParameter(format!(
            "unit '{}' is not allowed here",
            unit
        )));
    }
    Ok(unit)
}

fn mkdisk_params(params: &[(String, String)]) -> Result<MkdiskParams> {
    reject_unknown(params, &["size", "unit"])?;
    Ok(MkdiskParams {
        size: parse_size(params)?,
        unit: parse_unit(
            params,
            SizeUnit::Megabytes,
            &[SizeUnit::Kilobytes, SizeUnit::Megabytes],
        )?,
    })
}

fn fdisk_params(params: &[(String, String)]) -> Result<FdiskParams> {
    reject_unknown(params, &["size", "unit", "letter", "name"])?;

    let size = parse_size(params)?;
    let unit = parse_unit(
        params,
        SizeUnit::Kilobytes,
        &[SizeUnit::Bytes, SizeUnit::Kilobytes, SizeUnit::Megabytes],
    )?;

    let raw_letter = required(params, "letter")?;
    let mut chars = raw_letter.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => c,
        _ => {
            return Err(DiskError::InvalidParameter(format!(
                "letter must be a single letter, got '{}'",
                raw_letter
            )))
        }
    };

    let name = required(params, "name")?.to_string();

    Ok(FdiskParams {
        size,
        unit,
        letter,
        name,
    })
}
