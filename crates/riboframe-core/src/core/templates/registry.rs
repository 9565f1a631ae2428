use super::defs;
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// An idealized residue in its reference frame.
///
/// `heavy_atoms` are the atoms matched against observed coordinates when a
/// frame is fitted; `hydrogens` are placed from `coordinates` once a frame
/// exists. The reference coordinates are laid out so that the mean of the
/// heavy atoms sits at the origin.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResidueTemplate {
    pub heavy_atoms: Vec<String>,
    #[serde(default)]
    pub hydrogens: Vec<String>,
    pub coordinates: HashMap<String, [f64; 3]>,
    #[serde(default)]
    pub centers: HashMap<String, Vec<String>>,
}

impl ResidueTemplate {
    /// The reference-frame position of one atom, when the template has it.
    pub fn coordinate(&self, atom: &str) -> Option<Point3<f64>> {
        self.coordinates
            .get(atom)
            .map(|c| Point3::new(c[0], c[1], c[2]))
    }
}

/// A modified residue expressed through its standard parent.
///
/// `atoms` maps observed atom names to the parent's atom names; only mapped
/// atoms take part in frame fitting.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ModifiedTemplate {
    pub standard: String,
    pub atoms: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    #[serde(default)]
    standard: HashMap<String, ResidueTemplate>,
    #[serde(default)]
    modified: HashMap<String, ModifiedTemplate>,
}

/// The catalog of residue templates used for frame fitting.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    standard: HashMap<String, ResidueTemplate>,
    modified: HashMap<String, ModifiedTemplate>,
}

impl TemplateRegistry {
    pub fn load(path: &Path) -> Result<Self, TemplateLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| TemplateLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: TemplateFile = toml::from_str(content)?;
        Ok(Self {
            standard: file.standard,
            modified: file.modified,
        })
    }

    pub fn insert_standard(&mut self, name: &str, template: ResidueTemplate) {
        self.standard.insert(name.to_string(), template);
    }

    pub fn insert_modified(&mut self, name: &str, template: ModifiedTemplate) {
        self.modified.insert(name.to_string(), template);
    }

    pub fn standard(&self, name: &str) -> Option<&ResidueTemplate> {
        self.standard.get(name)
    }

    pub fn modified(&self, name: &str) -> Option<&ModifiedTemplate> {
        self.modified.get(name)
    }

    /// Whether a frame can be fitted for this component at all.
    pub fn is_known(&self, name: &str) -> bool {
        self.standard.contains_key(name) || self.modified.contains_key(name)
    }

    /// The template holding reference coordinates for `name`: itself for a
    /// standard component, its parent for a modified one.
    pub fn reference(&self, name: &str) -> Option<&ResidueTemplate> {
        self.standard(name)
            .or_else(|| self.modified(name).and_then(|m| self.standard(&m.standard)))
    }

    /// All named atom groups applying to `name`, in a deterministic order.
    ///
    /// Template-declared groups come first (a modified component inherits its
    /// parent's), then the built-in nucleotide and amino-acid groups. Every
    /// modified nucleotide gets the default sugar and phosphate lists, since
    /// its own atom names follow the parent's backbone.
    pub fn center_groups(&self, name: &str) -> Vec<(String, Vec<String>)> {
        let mut groups = Vec::new();

        if let Some(template) = self.reference(name) {
            let mut declared: Vec<(&String, &Vec<String>)> = template.centers.iter().collect();
            declared.sort_by(|a, b| a.0.cmp(b.0));
            for (group, atoms) in declared {
                groups.push((group.clone(), atoms.clone()));
            }
        }

        if let Some(atoms) = defs::NT_SUGAR.get(name) {
            groups.push(to_owned_group("nt_sugar", atoms));
        }
        if let Some(atoms) = defs::NT_PHOSPHATE.get(name) {
            groups.push(to_owned_group("nt_phosphate", atoms));
        }
        if self.modified.contains_key(name) {
            groups.push(to_owned_group("nt_sugar", defs::modified_nt_sugar()));
            groups.push(to_owned_group("nt_phosphate", defs::modified_nt_phosphate()));
        }
        if let Some(atoms) = defs::AA_FG.get(name) {
            groups.push(to_owned_group("aa_fg", atoms));
            groups.push(to_owned_group("aa_backbone", defs::AA_BACKBONE));
        }

        groups
    }
}

fn to_owned_group(group: &str, atoms: &[&str]) -> (String, Vec<String>) {
    (
        group.to_string(),
        atoms.iter().map(|a| a.to_string()).collect(),
    )
}

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
        [standard.A]
        heavy_atoms = ["N9", "C8", "N7"]
        hydrogens = ["H8"]

        [standard.A.coordinates]
        "N9" = [0.0, 1.0, 0.0]
        "C8" = [1.0, 0.0, 0.0]
        "N7" = [-1.0, -1.0, 0.0]
        "H8" = [2.0, 0.0, 0.0]

        [standard.A.centers]
        ring = ["N9", "C8", "N7"]

        [modified.1MA]
        standard = "A"

        [modified.1MA.atoms]
        "N9" = "N9"
        "C8" = "C8"
        "N7" = "N7"
    "#;

    #[test]
    fn parses_standard_and_modified_templates() {
        let registry = TemplateRegistry::from_toml_str(SAMPLE).unwrap();
        let template = registry.standard("A").unwrap();
        assert_eq!(template.heavy_atoms, vec!["N9", "C8", "N7"]);
        assert_eq!(template.hydrogens, vec!["H8"]);
        assert_eq!(
            template.coordinate("H8").unwrap(),
            Point3::new(2.0, 0.0, 0.0)
        );
        assert!(template.coordinate("C2").is_none());

        let modified = registry.modified("1MA").unwrap();
        assert_eq!(modified.standard, "A");
        assert_eq!(modified.atoms["C8"], "C8");

        assert!(registry.is_known("A"));
        assert!(registry.is_known("1MA"));
        assert!(!registry.is_known("HOH"));
    }

    #[test]
    fn reference_resolves_through_the_parent() {
        let registry = TemplateRegistry::from_toml_str(SAMPLE).unwrap();
        let direct = registry.reference("A").unwrap();
        let through_parent = registry.reference("1MA").unwrap();
        assert_eq!(direct, through_parent);
        assert!(registry.reference("XYZ").is_none());
    }

    #[test]
    fn center_groups_merge_declared_and_builtin() {
        let registry = TemplateRegistry::from_toml_str(SAMPLE).unwrap();

        let groups = registry.center_groups("A");
        let names: Vec<&str> = groups.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["ring", "nt_sugar", "nt_phosphate"]);

        let inherited = registry.center_groups("1MA");
        let names: Vec<&str> = inherited.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["ring", "nt_sugar", "nt_phosphate"]);

        let amino = registry.center_groups("HIS");
        let names: Vec<&str> = amino.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["aa_fg", "aa_backbone"]);

        assert!(registry.center_groups("HOH").is_empty());
    }

    #[test]
    fn load_reads_a_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let registry = TemplateRegistry::load(file.path()).unwrap();
        assert!(registry.is_known("1MA"));
    }

    #[test]
    fn load_reports_missing_files_and_bad_toml() {
        let missing = TemplateRegistry::load(Path::new("/nonexistent/templates.toml"));
        assert!(matches!(missing, Err(TemplateLoadError::Io { .. })));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"standard = 3").unwrap();
        let bad = TemplateRegistry::load(file.path());
        assert!(matches!(bad, Err(TemplateLoadError::Toml { .. })));
    }
}
