//! Shared pieces of the `msgpack-pack` and `msgpack-unpack` binaries.
//!
//! Both tools read all of stdin and write one document to stdout; the
//! functions here do the conversion so they can be tested without a process.

use clap::Args;
use msgpack_codec::{packb, unpackb_with_ext_hook, DecodeError, EncodeError, JsonError, Options, Value};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Convert(#[from] JsonError),
}

/// Codec flags shared by both tools.
#[derive(Debug, Clone, Default, Args)]
pub struct CodecArgs {
    /// Codec option to enable, e.g. NON_STR_KEYS. Repeatable.
    #[arg(long = "option", value_name = "NAME", value_parser = parse_option)]
    pub options: Vec<Options>,
}

impl CodecArgs {
    pub fn options(&self) -> Options {
        self.options.iter().fold(Options::empty(), |acc, o| acc | *o)
    }
}

fn parse_option(name: &str) -> Result<Options, String> {
    Options::from_name(&name.to_ascii_uppercase()).ok_or_else(|| {
        let known: Vec<&str> = Options::all().iter_names().map(|(n, _)| n).collect();
        format!("unknown option {name:?}, expected one of {}", known.join(", "))
    })
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Fails only when a global subscriber is already set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// JSON text to MessagePack bytes.
pub fn pack(json: &str, options: Options) -> Result<Vec<u8>, CliError> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    let bytes = packb(&Value::from(parsed), options)?;
    debug!(len = bytes.len(), "packed");
    Ok(bytes)
}

/// MessagePack bytes to JSON text. Extension values are rendered as
/// `{"ext": tag, "data": [bytes...]}`.
pub fn unpack(bytes: &[u8], options: Options, pretty: bool) -> Result<String, CliError> {
    let value = unpackb_with_ext_hook(bytes, options, |tag, data| {
        Ok(Value::map([
            ("ext", Value::from(tag)),
            (
                "data",
                Value::Array(data.iter().map(|&b| Value::from(b)).collect()),
            ),
        ]))
    })?;
    let json = serde_json::Value::try_from(value)?;
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_json_object() {
        let bytes = pack(r#"{"a": 1, "b": [true, null]}"#, Options::empty()).unwrap();
        assert_eq!(
            bytes,
            [0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0x92, 0xc3, 0xc0]
        );
    }

    #[test]
    fn pack_rejects_invalid_json() {
        assert!(matches!(pack("{", Options::empty()), Err(CliError::Json(_))));
    }

    #[test]
    fn unpack_renders_ext() {
        let out = unpack(&[0x91, 0xd5, 0x02, 0x0a, 0x0b], Options::empty(), false).unwrap();
        assert_eq!(out, r#"[{"ext":2,"data":[10,11]}]"#);
    }

    #[test]
    fn unpack_non_str_keys_fail_conversion() {
        let err = unpack(&[0x81, 0x01, 0xc3], Options::NON_STR_KEYS, false).unwrap_err();
        assert!(matches!(err, CliError::Convert(JsonError::NonStrKey { .. })));
        let err = unpack(&[0x81, 0x01, 0xc3], Options::empty(), false).unwrap_err();
        assert!(matches!(err, CliError::Decode(DecodeError::NonStrKey { .. })));
    }

    #[test]
    fn option_names_parse_case_insensitively() {
        assert_eq!(parse_option("non_str_keys"), Ok(Options::NON_STR_KEYS));
        assert!(parse_option("SORT_KEYS").is_err());
    }
}
