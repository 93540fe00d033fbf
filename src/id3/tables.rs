//! Static frame tables and the rules that pick a frame for a metadata key.
//!
//! Keys are first normalized from generic names (`title`, `artist`) to frame
//! ids, then resolved against the frame tables in priority order. Keys that
//! match no table fall through to a TXXX frame, so every key resolves.

use log::trace;

use crate::id3::frames::FrameId;
use crate::id3::header::TagVersion;
use crate::id3::metadata::Metadata;

const fn ids<const N: usize>(raw: [&[u8; 4]; N]) -> [FrameId; N] {
    let mut out = [FrameId::TXXX; N];
    let mut i = 0;
    while i < N {
        out[i] = FrameId::new(*raw[i]);
        i += 1;
    }
    out
}

/// Text frames shared by v2.3 and v2.4.
pub static COMMON_TAGS: [FrameId; 32] = ids([
    b"TALB", b"TBPM", b"TCOM", b"TCON", b"TCOP", b"TDLY", b"TENC", b"TEXT",
    b"TFLT", b"TIT1", b"TIT2", b"TIT3", b"TKEY", b"TLAN", b"TLEN", b"TMED",
    b"TOAL", b"TOFN", b"TOLY", b"TOPE", b"TOWN", b"TPE1", b"TPE2", b"TPE3",
    b"TPE4", b"TPOS", b"TPUB", b"TRCK", b"TRSN", b"TRSO", b"TSRC", b"TSSE",
]);

/// Text frames introduced in v2.4.
pub static V4_TAGS: [FrameId; 13] = ids([
    b"TDEN", b"TDOR", b"TDRC", b"TDRL", b"TDTG", b"TIPL", b"TMCL", b"TMOO",
    b"TPRO", b"TSOA", b"TSOP", b"TSOT", b"TSST",
]);

/// Text frames retired by v2.4.
pub static V3_TAGS: [FrameId; 6] = ids([b"TDAT", b"TIME", b"TORY", b"TRDA", b"TSIZ", b"TYER"]);

/// Generic key to frame id, applied for both versions.
pub static V34_KEY_MAP: &[(&str, &str)] = &[
    ("album", "TALB"),
    ("composer", "TCOM"),
    ("genre", "TCON"),
    ("copyright", "TCOP"),
    ("encoded_by", "TENC"),
    ("title", "TIT2"),
    ("language", "TLAN"),
    ("artist", "TPE1"),
    ("album_artist", "TPE2"),
    ("performer", "TPE3"),
    ("disc", "TPOS"),
    ("publisher", "TPUB"),
    ("track", "TRCK"),
    ("encoder", "TSSE"),
];

/// Extra remapping applied after [`V34_KEY_MAP`] for v2.4 only.
pub static V4_KEY_MAP: &[(&str, &str)] = &[
    ("date", "TDRL"),
    ("date", "TDRC"),
    ("creation_time", "TDEN"),
    ("album-sort", "TSOA"),
    ("artist-sort", "TSOP"),
    ("title-sort", "TSOT"),
];

fn remap(metadata: &Metadata, map: &[(&str, &str)]) -> Metadata {
    let mut out = Metadata::new();
    for (key, value) in metadata.iter() {
        let target = map
            .iter()
            .find(|(generic, _)| generic.eq_ignore_ascii_case(key))
            .map(|&(_, native)| native);
        match target {
            Some(native) => {
                trace!("remapped key {:?} to {}", key, native);
                out.set(native, value);
            }
            None => out.set(key, value),
        }
    }
    out
}

/// Rewrite generic keys to the frame ids used by `version`.
pub fn normalize_keys(metadata: &Metadata, version: TagVersion) -> Metadata {
    let normalized = remap(metadata, V34_KEY_MAP);
    match version {
        TagVersion::V4 => remap(&normalized, V4_KEY_MAP),
        TagVersion::V3 => normalized,
    }
}

/// One step of the resolver chain: a frame table and the versions it serves.
pub struct Rule {
    pub table: &'static [FrameId],
    pub applies: fn(TagVersion) -> bool,
}

/// Resolver chain, highest priority first.
pub static RULES: [Rule; 3] = [
    Rule { table: &COMMON_TAGS, applies: |_| true },
    Rule { table: &V3_TAGS, applies: |v| v == TagVersion::V3 },
    Rule { table: &V4_TAGS, applies: |v| v == TagVersion::V4 },
];

/// Outcome of resolving a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The key names a known text frame; the value is written alone.
    Known(FrameId),
    /// No table matched; key and value go into a TXXX frame.
    UserText,
}

/// Resolve `key` against `rules` for `version`.
pub fn resolve_with(rules: &[Rule], key: &str, version: TagVersion) -> Resolution {
    if !key.starts_with('T') {
        return Resolution::UserText;
    }
    let Some(id) = FrameId::from_key(key) else {
        return Resolution::UserText;
    };

    rules
        .iter()
        .filter(|rule| (rule.applies)(version))
        .find_map(|rule| rule.table.iter().copied().find(|&known| known == id))
        .map_or(Resolution::UserText, Resolution::Known)
}

pub fn resolve(key: &str, version: TagVersion) -> Resolution {
    resolve_with(&RULES, key, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &[u8; 4]) -> FrameId {
        FrameId::new(*s)
    }

    #[test]
    fn tables_are_duplicate_free() {
        for table in [&COMMON_TAGS[..], &V3_TAGS[..], &V4_TAGS[..]] {
            let mut sorted = table.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), table.len());
        }
    }

    #[test]
    fn version_specific_frames() {
        assert_eq!(resolve("TYER", TagVersion::V3), Resolution::Known(id(b"TYER")));
        assert_eq!(resolve("TYER", TagVersion::V4), Resolution::UserText);
        assert_eq!(resolve("TDRC", TagVersion::V4), Resolution::Known(id(b"TDRC")));
        assert_eq!(resolve("TDRC", TagVersion::V3), Resolution::UserText);
        assert_eq!(resolve("TIT2", TagVersion::V3), Resolution::Known(id(b"TIT2")));
        assert_eq!(resolve("TIT2", TagVersion::V4), Resolution::Known(id(b"TIT2")));
    }

    #[test]
    fn ineligible_keys_fall_back() {
        assert_eq!(resolve("custom-key", TagVersion::V4), Resolution::UserText);
        assert_eq!(resolve("tit2", TagVersion::V4), Resolution::UserText);
        assert_eq!(resolve("TIT", TagVersion::V4), Resolution::UserText);
        assert_eq!(resolve("WOAR", TagVersion::V4), Resolution::UserText);
        assert_eq!(resolve("TXXX", TagVersion::V4), Resolution::UserText);
        assert_eq!(resolve("", TagVersion::V3), Resolution::UserText);
    }

    #[test]
    fn earlier_rule_wins() {
        static FIRST: [FrameId; 1] = [FrameId::new(*b"TZZZ")];
        static SECOND: [FrameId; 2] = [FrameId::new(*b"TYYY"), FrameId::new(*b"TZZZ")];
        let rules = [
            Rule { table: &FIRST, applies: |_| true },
            Rule { table: &SECOND, applies: |v| v == TagVersion::V4 },
        ];
        assert_eq!(resolve_with(&rules, "TZZZ", TagVersion::V4), Resolution::Known(id(b"TZZZ")));
        assert_eq!(resolve_with(&rules, "TYYY", TagVersion::V4), Resolution::Known(id(b"TYYY")));
        assert_eq!(resolve_with(&rules, "TYYY", TagVersion::V3), Resolution::UserText);

        let common = RULES.iter().position(|r| r.table.contains(&id(b"TIT2")));
        assert_eq!(common, Some(0));
    }

    #[test]
    fn normalize_common_keys() {
        let m: Metadata = [("Title", "Song"), ("artist", "Band"), ("date", "2024")]
            .into_iter()
            .collect();

        let v3 = normalize_keys(&m, TagVersion::V3);
        assert_eq!(v3.keys(), ["TIT2", "TPE1", "date"]);

        let v4 = normalize_keys(&m, TagVersion::V4);
        assert_eq!(v4.keys(), ["TIT2", "TPE1", "TDRL"]);
        assert_eq!(v4.get("TDRL"), Some("2024"));
    }

    #[test]
    fn normalize_merges_colliding_keys() {
        let m: Metadata = [("TIT2", "old"), ("album", "A"), ("title", "new")]
            .into_iter()
            .collect();
        let out = normalize_keys(&m, TagVersion::V4);
        assert_eq!(out.iter().collect::<Vec<_>>(), [("TIT2", "new"), ("TALB", "A")]);
        assert_eq!(m.len(), 3);
    }
}
