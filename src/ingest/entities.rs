//! Parsing of the `entities_str` cell: `;`-separated `name(type)` mentions.

/// A successfully parsed mention. `ordinal` is its position among the
/// candidates that carried both parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMention {
    pub ordinal: usize,
    pub name: String,
    pub entity_type: String,
}

/// Why a candidate was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// Missing `(` or `)`; such candidates never receive an ordinal.
    NoParentheses,
}

/// Outcome of one mention candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityParse {
    Parsed(EntityMention),
    Skipped { raw: String, reason: Malformed },
}

impl EntityParse {
    pub fn mention(&self) -> Option<&EntityMention> {
        match self {
            EntityParse::Parsed(m) => Some(m),
            EntityParse::Skipped { .. } => None,
        }
    }
}

/// Parse every candidate in `raw`, in order. Blank candidates (e.g. from a
/// trailing `;`) are not reported at all.
pub fn parse_entities(raw: &str) -> Vec<EntityParse> {
    let mut out = Vec::new();
    let mut ordinal = 0;

    for candidate in raw.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        if !(candidate.contains('(') && candidate.contains(')')) {
            out.push(EntityParse::Skipped {
                raw: candidate.to_string(),
                reason: Malformed::NoParentheses,
            });
            continue;
        }

        let parsed = match split_mention(candidate) {
            Ok((name, entity_type)) => EntityParse::Parsed(EntityMention {
                ordinal,
                name,
                entity_type,
            }),
            Err(reason) => EntityParse::Skipped {
                raw: candidate.to_string(),
                reason,
            },
        };
        out.push(parsed);
        ordinal += 1;
    }

    out
}

/// Split `name(type)` at the last `(`. Every `)` is removed from the type.
/// Either half may come out empty; `(ORG)` is a nameless ORG mention.
pub fn split_mention(candidate: &str) -> Result<(String, String), Malformed> {
    let (name, rest) = candidate.rsplit_once('(').ok_or(Malformed::NoParentheses)?;
    let entity_type = rest.replace(')', "");
    Ok((name.trim().to_string(), entity_type.trim().to_string()))
}
