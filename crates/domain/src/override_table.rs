use std::collections::HashMap;

/// Static hostname → literal IP answers, keyed by fully qualified name.
///
/// Names are stored with a trailing dot and matched exactly (case-sensitive).
/// Values are kept as written; callers decide whether they parse as an IP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: HashMap<String, String>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse hosts-style text: `#` starts a comment, field 0 is the IP and
    /// every following field is a hostname it answers for. Lines with fewer
    /// than two fields are skipped. Later lines win on duplicate names.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();

        for line in text.lines() {
            let line = match line.find('#') {
                Some(comment_start) => &line[..comment_start],
                None => line,
            };

            let mut fields = line.split_whitespace();
            let Some(ip) = fields.next() else {
                continue;
            };

            for name in fields {
                table.insert(name, ip);
            }
        }

        table
    }

    pub fn insert(&mut self, name: &str, ip: &str) {
        self.entries.insert(fqdn(name), ip.to_string());
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        if name.ends_with('.') {
            self.entries.get(name).map(String::as_str)
        } else {
            self.entries.get(&fqdn(name)).map(String::as_str)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}
