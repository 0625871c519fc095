//! Reading a generated registry back.
//!
//! Only the layout produced by [`RegistryWriter`](crate::RegistryWriter) is
//! understood: one entry per line between the `export const routes = [`
//! and `];` lines. Anything else in the file is ignored.

use camino::Utf8Path;
use rw_core::{Method, RoutePath};

use crate::error::RegistryError;
use crate::writer::{ROUTES_CLOSE, ROUTES_OPEN};

/// One `{ method, path, route }` entry of a generated registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryEntry {
    /// HTTP method.
    pub method: Method,
    /// URL path template.
    pub path: RoutePath,
    /// Specifier passed to the entry's lazy `import()`.
    pub import_path: String,
}

/// Parser for generated registry modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryReader;

impl RegistryReader {
    /// Reads and parses the registry at `path`.
    pub fn load(path: &Utf8Path) -> Result<Vec<RegistryEntry>, RegistryError> {
        let source =
            std::fs::read_to_string(path).map_err(|source| RegistryError::io(path, source))?;
        Self::parse(&source)
    }

    /// Parses registry source, preserving entry order.
    pub fn parse(source: &str) -> Result<Vec<RegistryEntry>, RegistryError> {
        let mut lines = source.lines().enumerate();

        let opened = lines.by_ref().any(|(_, line)| line.trim() == ROUTES_OPEN);
        if !opened {
            return Err(RegistryError::parse(0, format!("missing '{ROUTES_OPEN}'")));
        }

        let mut entries = Vec::new();
        for (index, line) in lines {
            let number = index + 1;
            let line = line.trim();
            if line == ROUTES_CLOSE {
                return Ok(entries);
            }
            if line.is_empty() {
                continue;
            }
            entries.push(parse_entry(line, number)?);
        }

        Err(RegistryError::parse(
            source.lines().count(),
            format!("missing '{ROUTES_CLOSE}'"),
        ))
    }
}

fn parse_entry(line: &str, number: usize) -> Result<RegistryEntry, RegistryError> {
    let mut cursor = Cursor { rest: line, line: number };

    cursor.expect("{")?;
    cursor.expect("method:")?;
    let method = cursor.string()?;
    cursor.expect(",")?;
    cursor.expect("path:")?;
    let path = cursor.string()?;
    cursor.expect(",")?;
    cursor.expect("route:")?;
    cursor.expect("()")?;
    cursor.expect("=>")?;
    cursor.expect("import(")?;
    let import_path = cursor.string()?;
    cursor.expect(")")?;
    cursor.expect("}")?;
    cursor.expect(",")?;

    let method = method
        .parse::<Method>()
        .map_err(|err| RegistryError::parse(number, err.to_string()))?;
    let path = RoutePath::new(path).map_err(|err| RegistryError::parse(number, err.to_string()))?;

    Ok(RegistryEntry {
        method,
        path,
        import_path,
    })
}

struct Cursor<'a> {
    rest: &'a str,
    line: usize,
}

impl Cursor<'_> {
    fn expect(&mut self, token: &str) -> Result<(), RegistryError> {
        let rest = self.rest.trim_start();
        match rest.strip_prefix(token) {
            Some(after) => {
                self.rest = after;
                Ok(())
            }
            None => Err(RegistryError::parse(self.line, format!("expected '{token}'"))),
        }
    }

    /// Consumes one JSON string literal.
    fn string(&mut self) -> Result<String, RegistryError> {
        let rest = self.rest.trim_start();
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<String>();
        match stream.next() {
            Some(Ok(value)) => {
                self.rest = &rest[stream.byte_offset()..];
                Ok(value)
            }
            Some(Err(err)) => Err(RegistryError::parse(self.line, err.to_string())),
            None => Err(RegistryError::parse(self.line, "expected string literal")),
        }
    }
}
