//! Picks the code page used for strings that carry no unicode marker.

use carchive_format::encoding_rs::Encoding;
use carchive_format::{default_code_page, TextEncoding};

use crate::error::{Error, Result};

/// Checked in order; the first one that names a known encoding wins.
const VARS: [&str; 4] = ["CARCHIVE_ENCODING", "LC_ALL", "LC_CTYPE", "LANG"];

/// Resolves an explicit `--encoding` label to a code page.
pub fn code_page(label: &str) -> Result<&'static Encoding> {
    match TextEncoding::for_label(label) {
        Ok(TextEncoding::CodePage(encoding)) => Ok(encoding),
        Ok(TextEncoding::Utf16Le) => Err(Error::NotACodePage(label.to_string())),
        Err(source) => Err(Error::Encoding {
            label: label.to_string(),
            source,
        }),
    }
}

/// The process locale's code page, falling back to windows-1252.
pub fn preferred_encoding() -> &'static Encoding {
    from_vars(|name| std::env::var(name).ok()).unwrap_or_else(default_code_page)
}

fn from_vars<F>(var: F) -> Option<&'static Encoding>
where
    F: Fn(&str) -> Option<String>,
{
    for name in VARS.iter() {
        let value = match var(name) {
            Some(v) if !v.is_empty() => v,
            _ => continue,
        };

        let label = if *name == "CARCHIVE_ENCODING" {
            value.as_str()
        } else {
            match codeset(&value) {
                Some(label) => label,
                None => continue,
            }
        };

        if let Ok(TextEncoding::CodePage(encoding)) = TextEncoding::for_label(label) {
            tracing::debug!(var = *name, encoding = encoding.name(), "using locale encoding");
            return Some(encoding);
        }
    }
    None
}

/// Extracts the codeset from a POSIX locale name such as `de_DE.ISO-8859-15@euro`.
fn codeset(locale: &str) -> Option<&str> {
    let rest = &locale[locale.find('.')? + 1..];
    let end = rest.find('@').unwrap_or_else(|| rest.len());
    Some(&rest[..end]).filter(|s| !s.is_empty())
}
