// src/search/synonyms.rs
// Static bidirectional abbreviation/synonym table and the query expander.
// Built once at process start; never mutated afterwards.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical term -> declared abbreviations and equivalent terms. All
/// entries upper-case; the reverse direction is derived at build time and
/// may be many-to-many (QUAD maps back to QUADRO, QUADRADA and QUADRADO).
const RAW_SYNONYMS: &[(&str, &[&str])] = &[
    // Iluminacao
    ("PAINEL", &["LUMINARIA", "PLAFON", "LED", "LUM", "LUMIN"]),
    ("LUMINARIA", &["PAINEL", "PLAFON", "LED", "LUM", "LUMIN"]),
    ("PLAFON", &["PAINEL", "LUMINARIA", "LED"]),
    ("LED", &["LUMINARIA", "PAINEL", "REFLETOR"]),
    ("ARANDELA", &["ARAND"]),
    ("REFLETOR", &["REF"]),
    ("LAMPADA", &["LAMP"]),
    // Fios e cabos
    ("FIO", &["CABO", "CONDUTOR", "CB", "CAB"]),
    ("CABO", &["FIO", "CONDUTOR", "CB", "CAB"]),
    // Infraestrutura
    ("ELETRODUTO", &["CONDUITE", "TUBO", "ELET"]),
    (
        "CONDUITE",
        &[
            "ELETRODUTO",
            "TUBO",
            "MANGUEIRA",
            "MANGUEIRA CORRUGADA",
            "ELETRODUTO CORRUGADO",
        ],
    ),
    ("CONDULETE", &["CAIXA MULTIPLA", "CX MULTIPLA"]),
    ("CAIXA", &["CX", "CX.", "CXA"]),
    ("QUADRO", &["QD", "QD.", "QDR", "QUAD"]),
    ("QUADRADA", &["QUAD", "QD", "QDR"]),
    ("QUADRADO", &["QUAD", "QD", "QDR"]),
    // Dispositivos e modulos
    (
        "DISJUNTOR",
        &["MINI DISJUNTOR", "DPS", "DR", "DISJ", "DISJ.", "DISJUN", "BREAKER"],
    ),
    ("TOMADA", &["CONJUNTO", "PLACA", "TOM", "TOM."]),
    ("INTERRUPTOR", &["CONJUNTO", "TECLA", "INT", "INT.", "INTER"]),
    ("MODULO", &["MOD", "MOD.", "MÓDULO"]),
    ("PLACA", &["PL", "PL.", "ESPELHO"]),
    ("DR", &["DIFERENCIAL", "RESIDUAL"]),
    // Instalacao
    ("EMBUTIR", &["EMB", "EMB."]),
    ("SOBREPOR", &["SOB", "SOB.", "EXTERNO"]),
    ("ABRACADEIRA", &["ABRAC"]),
    ("DISTRIBUICAO", &["DIST"]),
    ("ISOLANTE", &["ISOL"]),
    // Materiais
    ("ALUMINIO", &["ALUM"]),
    ("GALVANIZADO", &["GALV"]),
    ("ZINCADO", &["ZINC"]),
    ("FLEXIVEL", &["FLEX"]),
    // Fases
    ("MONOFASICO", &["MONOPOLAR", "MONO"]),
    ("MONOPOLAR", &["MONOFASICO", "MONO"]),
    ("BIFASICO", &["BIPOLAR"]),
    ("BIPOLAR", &["BIFASICO"]),
    ("TRIFASICO", &["TRIPOLAR"]),
    ("TRIPOLAR", &["TRIFASICO"]),
    // Cores
    ("BRANCO", &["BC"]),
    ("PRETO", &["PT"]),
    ("VERMELHO", &["VM"]),
    ("VERDE", &["VD"]),
    ("AMARELO", &["AM"]),
    ("AZUL", &["AZ"]),
    ("CINZA", &["CZ"]),
    // Unidades e medidas
    ("PC", &["PECA"]),
    ("MT", &["METRO"]),
    ("MM", &["MILIMETRO"]),
    // Buchas e fixacao
    ("TIJOLO", &["TIJ"]),
    ("FURADO", &["FUR"]),
];

/// Minimum token length for prefix expansion against canonical terms.
const PREFIX_EXPANSION_MIN_LEN: usize = 3;

static S_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^S(0)?(\d+)$").unwrap());
static MM_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:[.,]\d+)?)MM$").unwrap());

/// Bidirectional lookup over the declared synonym list.
pub struct SynonymTable {
    forward: HashMap<&'static str, Vec<&'static str>>,
    reverse: HashMap<&'static str, Vec<&'static str>>,
}

/// Process-wide table, built once.
pub static SYNONYMS: Lazy<SynonymTable> = Lazy::new(SynonymTable::build);

impl SynonymTable {
    pub fn build() -> Self {
        let mut forward: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        let mut reverse: HashMap<&'static str, Vec<&'static str>> = HashMap::new();

        for (term, abbreviations) in RAW_SYNONYMS {
            forward
                .entry(*term)
                .or_default()
                .extend_from_slice(abbreviations);
            for abbreviation in *abbreviations {
                reverse.entry(*abbreviation).or_default().push(*term);
            }
        }

        Self { forward, reverse }
    }

    /// Declared abbreviations for a canonical term (empty if none).
    pub fn forward(&self, term: &str) -> &[&'static str] {
        self.forward.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Canonical terms that declare `abbreviation` (may be more than one).
    pub fn reverse(&self, abbreviation: &str) -> &[&'static str] {
        self.reverse
            .get(abbreviation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All strings considered equivalent to `token` for matching: the token
    /// itself, both lookup directions, canonical terms the token is a
    /// prefix of, and numeric/code pattern variants. Deduplicated,
    /// deterministic order.
    pub fn variations(&self, token: &str) -> Vec<String> {
        let normalized = token.to_uppercase();
        let mut variants = BTreeSet::new();
        variants.insert(normalized.clone());

        for v in self.forward(&normalized) {
            variants.insert((*v).to_string());
        }
        for v in self.reverse(&normalized) {
            variants.insert((*v).to_string());
        }

        if normalized.chars().count() >= PREFIX_EXPANSION_MIN_LEN {
            for (term, abbreviations) in RAW_SYNONYMS {
                if term.starts_with(&normalized) {
                    variants.insert((*term).to_string());
                    for v in *abbreviations {
                        variants.insert((*v).to_string());
                    }
                }
            }
        }

        add_pattern_variants(&normalized, &mut variants);

        variants.into_iter().collect()
    }
}

// S8 <-> S08 screw codes, decimal separator doubling (2.5 <-> 2,5) and
// bare-number variants for NNmm gauge tokens.
fn add_pattern_variants(token: &str, variants: &mut BTreeSet<String>) {
    if let Some(caps) = S_CODE_RE.captures(token) {
        let digits = &caps[2];
        variants.insert(format!("S{digits}"));
        if digits.len() == 1 {
            variants.insert(format!("S0{digits}"));
        }
    }

    if token.contains('.') || token.contains(',') {
        variants.insert(token.replace(',', "."));
        variants.insert(token.replace('.', ","));
    }

    if let Some(caps) = MM_SUFFIX_RE.captures(token) {
        let number = caps[1].to_string();
        variants.insert(number.replace(',', "."));
        variants.insert(number.replace('.', ","));
        variants.insert(number);
    }
}
