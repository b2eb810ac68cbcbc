use arbitrary::Arbitrary;
use gettext_msgfmt::catalog::Catalog;

/// Generate a catalog for fuzzing.
pub fn create_catalog(entries: Vec<(String, String)>) -> Catalog {
    let mut catalog = Catalog::new();
    for (key, value) in entries {
        catalog.insert(key, value);
    }
    catalog
}

/// A PO message for fuzzing.
///
/// The strings are written without escaping, so the generated PO text
/// is often malformed. That is fine: it exercises the error paths.
#[derive(Arbitrary, Debug)]
pub struct PoMessage {
    pub flags: Vec<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstrs: Vec<String>,
}

/// Generate PO text from a list of messages.
pub fn create_po(messages: &[PoMessage]) -> String {
    let mut text = String::new();
    for message in messages {
        if !message.flags.is_empty() {
            text.push_str(&format!("#, {}\n", message.flags.join(", ")));
        }
        if let Some(msgctxt) = &message.msgctxt {
            text.push_str(&format!("msgctxt \"{msgctxt}\"\n"));
        }
        text.push_str(&format!("msgid \"{}\"\n", message.msgid));
        match &message.msgid_plural {
            Some(msgid_plural) => {
                text.push_str(&format!("msgid_plural \"{msgid_plural}\"\n"));
                for (idx, msgstr) in message.msgstrs.iter().enumerate() {
                    text.push_str(&format!("msgstr[{idx}] \"{msgstr}\"\n"));
                }
            }
            None => {
                for msgstr in &message.msgstrs {
                    text.push_str(&format!("msgstr \"{msgstr}\"\n"));
                }
            }
        }
        text.push('\n');
    }
    text
}
