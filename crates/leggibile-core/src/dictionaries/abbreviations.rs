//! Italian abbreviation dictionary for sentence boundary detection.
//!
//! A period after one of these words does not end the sentence.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Abbreviations (lower-case, without the trailing period).
pub static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Titles and honorifics
    set.extend([
        "sig", "sigg", "sig.ra", "sig.na", "dott", "dott.ssa", "dr", "prof", "prof.ssa", "ing",
        "avv", "arch", "geom", "rag", "on", "sen", "mons", "egr", "gent", "gent.mo", "gent.ma",
        "spett", "ill", "ill.mo", "preg", "preg.mo", "cav", "comm", "dir", "pres", "s.e", "fra",
    ]);

    // Common abbreviations
    set.extend([
        "ecc", "etc", "es", "p.es", "cfr", "ca", "cit", "op", "ibid", "ivi", "vd", "v", "n.b",
        "p.s", "c.d", "cosid", "rif", "all", "tab", "fig", "cap", "capp", "par", "art",
        "artt", "co", "lett", "n", "nn", "nr", "num", "pag", "pagg", "p", "pp", "vol", "voll",
        "ed", "trad", "sez", "tit",
    ]);

    // Dates and time
    set.extend([
        "a.c", "d.c", "gen", "feb", "apr", "mag", "giu", "lug", "sett",
        "ott", "nov", "dic", "lun", "gio", "ven", "sab", "dom", "sec", "secc", "min", "h",
    ]);

    // Places and addresses
    set.extend([
        "c.so", "v.le", "p.zza", "p.za", "loc", "fraz", "prov", "reg", "naz", "int", "tel",
        "cell", "fax", "c.a.p",
    ]);

    // Business and organizations
    set.extend([
        "s.p.a", "spa", "s.r.l", "srl", "s.n.c", "snc", "s.a.s", "sas", "soc", "coop", "ass",
        "dip", "ist", "univ",
    ]);

    // Units of measurement
    set.extend([
        "kg", "hg", "g", "mg", "km", "m", "cm", "mm", "l", "ml", "cl", "mq", "mc", "q",
    ]);

    set
});

/// Check if a word is a known abbreviation.
pub fn is_abbreviation(word: &str) -> bool {
    let word_lower = word.to_lowercase();
    let trimmed = word_lower.trim_matches('.');
    ABBREVIATIONS.contains(trimmed)
}
