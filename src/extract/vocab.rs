//! Fixed vocabularies shared by entity extraction and query building.

/// Upper-case tokens that look like gene symbols but are not
pub const GENE_STOPLIST: &[&str] = &[
    "DNA", "RNA", "MRNA", "CDNA", "ATP", "ADP", "GTP", "NADH", "PCR", "QPCR", "RT-PCR", "USA",
    "FDA", "NIH", "CDC", "WHO", "THE", "AND", "FOR", "NOT", "BUT", "ARE", "WAS", "HOW", "WHY",
    "WHAT", "ROLE", "MRI", "CT", "PET", "ECG", "EEG", "ICU", "HIV", "AIDS", "COVID", "COVID-19",
    "SARS", "RCT", "BMI", "ROS", "GWAS", "SNP", "SNPS", "CRISPR", "ELISA", "IQ", "UK", "EU",
    "NMR", "USD",
];

/// Words marking a protein name when they follow a capitalized phrase
pub const PROTEIN_SUFFIXES: &[&str] = &[
    "protein",
    "receptor",
    "kinase",
    "phosphatase",
    "enzyme",
    "transporter",
    "channel",
    "factor",
];

/// Words marking a disease name when they follow a capitalized phrase
pub const DISEASE_SUFFIXES: &[&str] = &[
    "disease",
    "disorder",
    "syndrome",
    "deficiency",
    "cancer",
    "tumor",
    "carcinoma",
    "leukemia",
    "lymphoma",
];

/// Words marking a pathway name
pub const PATHWAY_SUFFIXES: &[&str] = &["pathway", "signaling", "signalling", "cascade", "axis"];

/// Indicator words per concept type, used both for intent detection and
/// for the keyword fallback.
pub const GENE_INDICATORS: &[&str] = &[
    "gene",
    "genes",
    "genetic",
    "genetics",
    "mutation",
    "mutations",
    "variant",
    "variants",
    "allele",
    "alleles",
    "polymorphism",
    "genome",
    "genomic",
    "expression",
];

pub const PROTEIN_INDICATORS: &[&str] = &[
    "protein",
    "proteins",
    "enzyme",
    "enzymes",
    "receptor",
    "receptors",
    "kinase",
    "antibody",
    "binding",
    "folding",
];

pub const PATHWAY_INDICATORS: &[&str] = &[
    "pathway",
    "pathways",
    "signaling",
    "signalling",
    "cascade",
    "metabolism",
    "metabolic",
];

pub const DISEASE_INDICATORS: &[&str] = &[
    "disease",
    "diseases",
    "disorder",
    "syndrome",
    "cancer",
    "tumor",
    "tumour",
    "infection",
    "deficiency",
    "diabetes",
    "dementia",
];

/// Concept types recognized by the fallback keyword scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concept {
    Gene,
    Protein,
    Pathway,
    Disease,
}

impl Concept {
    /// All concept types, in scan order
    pub const ALL: [Concept; 4] = [
        Concept::Gene,
        Concept::Protein,
        Concept::Pathway,
        Concept::Disease,
    ];

    /// Indicator vocabulary for this concept
    pub fn indicators(&self) -> &'static [&'static str] {
        match self {
            Concept::Gene => GENE_INDICATORS,
            Concept::Protein => PROTEIN_INDICATORS,
            Concept::Pathway => PATHWAY_INDICATORS,
            Concept::Disease => DISEASE_INDICATORS,
        }
    }
}
