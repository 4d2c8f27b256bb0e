//! Risk categories and the seed catalog.
//!
//! The seed catalog is the static input to corpus construction: curated
//! seed terms per category, the affix lists used for base inflation, the
//! glyph substitution map, the marker cycle, and the size targets. It is
//! loaded once at process start and treated as read-only configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Risk categories that a term can belong to.
///
/// The enumeration order is a semantic contract: when a text matches
/// terms from several categories, the reported category is the first one
/// in this order (see [`Category::all`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Threats, weapons, and descriptions of physical harm.
    Violence,
    /// Hate speech, slurs, and extremist rhetoric.
    Hate,
    /// Sexually explicit content.
    Sexual,
    /// Drug trade and consumption.
    Drugs,
    /// Abuse, self-harm, and exploitation.
    Abuse,
    /// Insults and vulgar language.
    Profanity,
    /// Fraud, phishing, and cybercrime.
    Scam,
}

impl Category {
    /// All categories in tie-break precedence order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Violence,
            Category::Hate,
            Category::Sexual,
            Category::Drugs,
            Category::Abuse,
            Category::Profanity,
            Category::Scam,
        ]
    }

    /// Returns the wire label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Violence => "violence",
            Category::Hate => "hate",
            Category::Sexual => "sexual",
            Category::Drugs => "drugs",
            Category::Abuse => "abuse",
            Category::Profanity => "profanity",
            Category::Scam => "scam",
        }
    }

    /// Returns a human-readable name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Violence => "Violence",
            Category::Hate => "Hate",
            Category::Sexual => "Sexual",
            Category::Drugs => "Drugs",
            Category::Abuse => "Abuse",
            Category::Profanity => "Profanity",
            Category::Scam => "Scam",
        }
    }
}

/// Errors detected while validating a seed catalog.
///
/// Any of these is fatal at startup: no corpus is published from a
/// malformed catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A category has no seed terms.
    #[error("category '{}' has no seed terms", .0.label())]
    EmptyCategory(Category),

    /// The prefix or suffix list is empty.
    #[error("affix lists must not be empty")]
    EmptyAffixes,

    /// The glyph substitution map is empty.
    #[error("glyph substitution map must not be empty")]
    EmptyGlyphMap,

    /// The marker cycle is empty.
    #[error("marker cycle must not be empty")]
    EmptyMarkers,

    /// A size target is zero.
    #[error("size targets must be positive")]
    ZeroTarget,
}

/// Static input data for corpus construction.
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    /// Seed terms per category, in [`Category::all`] order.
    pub seeds: Vec<(Category, Vec<String>)>,
    /// Prefixes used for base inflation, in application order.
    pub prefixes: Vec<String>,
    /// Suffixes used for base inflation, in application order.
    pub suffixes: Vec<String>,
    /// Letter to substitute-glyph mapping, in application order.
    pub glyph_map: Vec<(char, Vec<char>)>,
    /// Marker glyph cycle for the fallback obfuscation round.
    pub markers: Vec<char>,
    /// Minimum number of base (seed + affix-derived) terms to aim for.
    pub base_target: usize,
    /// Minimum number of obfuscated terms to aim for.
    pub obfuscated_target: usize,
}

impl SeedCatalog {
    /// Returns the built-in, versioned seed catalog.
    pub fn builtin() -> Self {
        Self {
            seeds: Category::all()
                .iter()
                .map(|&cat| {
                    (
                        cat,
                        builtin_seeds(cat).iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
            prefixes: BASE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            suffixes: BASE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            glyph_map: GLYPH_MAP
                .iter()
                .map(|&(c, subs)| (c, subs.to_vec()))
                .collect(),
            markers: MARKERS.to_vec(),
            base_target: TARGET_BASE_TERMS,
            obfuscated_target: TARGET_OBFUSCATED_TERMS,
        }
    }

    /// Validates the catalog, returning the first structural defect found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (category, terms) in &self.seeds {
            if terms.is_empty() {
                return Err(CatalogError::EmptyCategory(*category));
            }
        }
        if self.prefixes.is_empty() || self.suffixes.is_empty() {
            return Err(CatalogError::EmptyAffixes);
        }
        if self.glyph_map.is_empty() || self.glyph_map.iter().any(|(_, subs)| subs.is_empty()) {
            return Err(CatalogError::EmptyGlyphMap);
        }
        if self.markers.is_empty() {
            return Err(CatalogError::EmptyMarkers);
        }
        if self.base_target == 0 || self.obfuscated_target == 0 {
            return Err(CatalogError::ZeroTarget);
        }
        Ok(())
    }

    /// Returns the ordered substitute glyphs for a letter, if any.
    pub fn substitutes(&self, letter: char) -> Option<&[char]> {
        self.glyph_map
            .iter()
            .find(|(c, _)| *c == letter)
            .map(|(_, subs)| subs.as_slice())
    }
}

/// Default base-term target.
pub const TARGET_BASE_TERMS: usize = 10_000;

/// Default obfuscated-term target.
pub const TARGET_OBFUSCATED_TERMS: usize = 10_000;

fn builtin_seeds(category: Category) -> &'static [&'static str] {
    match category {
        Category::Violence => VIOLENCE_SEEDS,
        Category::Hate => HATE_SEEDS,
        Category::Sexual => SEXUAL_SEEDS,
        Category::Drugs => DRUGS_SEEDS,
        Category::Abuse => ABUSE_SEEDS,
        Category::Profanity => PROFANITY_SEEDS,
        Category::Scam => SCAM_SEEDS,
    }
}

const VIOLENCE_SEEDS: &[&str] = &[
    "kill", "killing", "killer", "murder", "massacre", "slaughter", "execute", "execution",
    "behead", "decapitate", "assassinate", "shoot", "gun down", "stab", "knife attack",
    "bomb", "bombing", "explosive", "explode", "detonate", "terror", "terrorist",
    "hostage", "kidnap", "abduct", "arson", "burn alive", "torture", "lynch", "gore",
    "bloodbath", "genocide", "ethnic cleansing", "war crime", "hitman", "sniper",
    "school shooting", "mass shooting", "suicide bomb", "car bomb", "grenade", "molotov",
    "sprengstoff", "anschlag", "attentat", "amoklauf", "erschiessen", "erstechen",
    "toeten", "mord", "folter", "blutbad", "waffengewalt", "gewaltfantasie", "anfassen",
    "rape", "raping", "rayping", "ich werde dich finden", "i will find you", "hurt you",
    "lock you", "oil up", "oiled up", "epstein",
];

const HATE_SEEDS: &[&str] = &[
    "nazi", "neo nazi", "white power", "kkk", "supremacist", "racist", "race war",
    "antisemitic", "anti semitic", "judenhass", "hate speech", "ethnic hatred",
    "xenophobic", "homophobic", "transphobic", "islamophobic", "bigot", "bigotry",
    "nigger", "nigga", "niqqa", "slur", "racial slur", "heil hitler", "sieg heil",
    "master race", "subhuman", "exterminate them", "deport them all", "gas them",
    "replace theory", "1488", "ausländer raus", "volksverräter", "rassenhass",
    "menschenverachtend", "n1gga",
];

const SEXUAL_SEEDS: &[&str] = &[
    "porn", "porno", "pornhub", "nude", "nudes", "nudity", "nsfw", "explicit", "xxx",
    "hardcore", "fetish", "bdsm", "deepthroat", "blowjob", "handjob", "anal", "cum",
    "creampie", "sexting", "sex chat", "onlyfans", "camgirl", "cam sex", "escort",
    "prostitute", "brothel", "incest", "bestiality", "rape fantasy", "child porn",
    "cp", "loli", "lolicon", "underage sex", "minor nudes", "revenge porn",
    "nacktbild", "sexvideo", "pornografisch", "erotisch", "intimfoto", "cumshot",
    "comshot",
];

const DRUGS_SEEDS: &[&str] = &[
    "cocaine", "coke", "crack", "meth", "methamphetamine", "heroin", "fentanyl",
    "opioid", "oxycodone", "morphine", "lsd", "ecstasy", "mdma", "ketamine",
    "pcp", "amphetamine", "speed", "weed", "marijuana", "cannabis", "hash",
    "drug deal", "dealer", "buy drugs", "sell drugs", "overdose", "inject heroin",
    "snort cocaine", "cook meth", "cartel", "narcotics", "dope", "pill mill",
    "drogen", "drogendealer", "koks", "gras", "hasch", "ecstasy pillen", "btm",
    "crackhead",
];

const ABUSE_SEEDS: &[&str] = &[
    "child abuse", "child sexual abuse", "grooming", "molest", "molestation",
    "domestic violence", "intimate partner violence", "self harm", "self-harm",
    "cut myself", "cutting", "suicide", "kill myself", "hang myself", "overdose myself",
    "abuse children", "beat your wife", "beat your kid", "shaken baby", "csa",
    "csam", "rape child", "underage exploitation", "forced marriage", "human trafficking",
    "zwangsprostitution", "kindesmissbrauch", "selbstmord", "ritzen", "suizid",
    "haeusliche gewalt", "homicide",
];

const PROFANITY_SEEDS: &[&str] = &[
    "fuck", "fucking", "motherfucker", "shit", "bullshit", "bitch", "bastard", "ass", "asshole",
    "dickhead", "cunt", "wanker", "prick", "slut", "whore", "son of a bitch",
    "retard", "dumbass", "jackass", "fucker", "idiot", "moron", "piece of shit",
    "fick", "scheisse", "miststueck", "hurensohn", "fotze", "arschloch", "wichser",
    "spast", "nutte", "verpiss dich", "halt die fresse", "opfer", "pussy",
    // Extended insult vocabulary.
    "douche", "douchebag", "dipshit", "shithead", "shitface", "piss", "pissed", "piss off",
    "freak", "loser", "garbage", "trash", "scumbag", "skank", "hoe", "ho", "twat", "jerk",
    "imbecile", "stupid", "idiotic", "dumb", "brain dead", "braindead", "cretin", "clown",
    "clownass", "wannabe", "sucker", "lame", "pathetic", "degenerate", "pervert", "psycho",
    "lunatic", "maniac", "weirdo", "fool", "tool", "numbnuts", "nutsack", "ballsack",
    "arse", "arsehole", "bollocks", "bloody hell", "f off", "screw you", "eat shit",
    "penner", "trottel", "depp", "idiotisch", "huso", "fotz", "spacken", "mongo",
    "bimbo", "simp", "cringe", "incel", "soyboy", "beta male", "alpha clown", "dogshit",
    "shitshow", "shitstorm", "asshat", "assclown", "asswipe", "butthead", "cocksucker",
    "cock", "dick", "penis", "boobs", "tits", "milf", "dildo", "buttplug", "cumshot",
    "jerkoff", "wixxer", "wixxa", "schwachkopf", "vollidiot", "knecht", "lappen",
];

const SCAM_SEEDS: &[&str] = &[
    "credit card dump", "stolen card", "cvv", "fullz", "phishing", "fake login",
    "account takeover", "steal password", "malware", "ransomware", "keylogger",
    "botnet", "ddos for hire", "hack account", "crack password", "bruteforce",
    "sim swap", "money mule", "ponzi", "pump and dump", "advance fee fraud",
    "romance scam", "gift card scam", "wire fraud", "bank fraud", "identity theft",
    "betrug", "phishing link", "konto hacken", "daten klauen",
];

const BASE_PREFIXES: &[&str] = &[
    "dirty", "filthy", "stupid", "dumb", "crazy", "foul", "gross", "toxic", "bloody", "damn",
    "hard", "extreme", "pure", "ultra", "mega", "insane", "savage", "aggressive", "nasty", "vile",
    "evil", "brutal", "raw", "wild", "mad", "cold", "dark", "loud", "chaos", "mean",
];

const BASE_SUFFIXES: &[&str] = &[
    "head", "face", "brain", "mouth", "rat", "pig", "dog", "lord", "king", "queen",
    "mode", "move", "plan", "crew", "zone", "style", "energy", "storm", "wave", "pattern",
];

const GLYPH_MAP: &[(char, &[char])] = &[
    ('a', &['4', '@']),
    ('e', &['3']),
    ('i', &['1', '!']),
    ('o', &['0']),
    ('s', &['5', '$']),
    ('t', &['7']),
    ('g', &['9']),
];

const MARKERS: &[char] = &['*', '.', '_', '-', '+', '~', '!', '$', '@'];
