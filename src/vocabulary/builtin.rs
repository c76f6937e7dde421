//! Vocabularies compiled into the binary, one per supported language.

pub const BUILTIN_VOCABULARIES: [(&str, &str); 10] = [
    ("ar", include_str!("../../assets/vocabs/ar.json")),
    ("de", include_str!("../../assets/vocabs/de.json")),
    ("en", include_str!("../../assets/vocabs/en.json")),
    ("fr", include_str!("../../assets/vocabs/fr.json")),
    ("nl", include_str!("../../assets/vocabs/nl.json")),
    ("pl", include_str!("../../assets/vocabs/pl.json")),
    ("pt", include_str!("../../assets/vocabs/pt.json")),
    ("ru", include_str!("../../assets/vocabs/ru.json")),
    ("tr", include_str!("../../assets/vocabs/tr.json")),
    ("uk", include_str!("../../assets/vocabs/uk.json")),
];
