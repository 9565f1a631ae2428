use super::atom::Atom;
use super::unit_id::{self, UnitIdParts};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use std::collections::HashMap;

/// Named center points and center-group definitions for one residue.
///
/// A center is resolved in three tiers: an explicitly set point (e.g. the
/// fitted base center), the mean of a configured atom-name group, or the
/// mean of all atoms sharing the requested name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Centers {
    points: HashMap<String, Point3<f64>>,
    groups: HashMap<String, Vec<String>>,
}

impl Centers {
    fn set_point(&mut self, name: &str, point: Point3<f64>) {
        self.points.insert(name.to_string(), point);
    }

    fn define_group(&mut self, name: &str, atom_names: Vec<String>) {
        self.groups.insert(name.to_string(), atom_names);
    }

    fn resolve(&self, name: &str, atoms: &[Atom]) -> Option<Point3<f64>> {
        if let Some(point) = self.points.get(name) {
            return Some(*point);
        }
        if let Some(group) = self.groups.get(name) {
            return mean_position(atoms.iter().filter(|a| group.iter().any(|n| n == &a.name)));
        }
        mean_position(atoms.iter().filter(|a| a.name == name))
    }

    /// The atom names behind a defined group, if any.
    pub fn definition(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }
}

fn mean_position<'a>(atoms: impl Iterator<Item = &'a Atom>) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for atom in atoms {
        sum += atom.position.coords;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Point3::from(sum / count as f64))
}

/// Represents one physical residue (nucleotide, amino acid, ligand, water)
/// after symmetry expansion and alternate-location resolution.
///
/// A residue owns its atoms exclusively. It is mutated exactly once, by the
/// loader's normalization pass (frame fitting, hydrogen inference, center
/// definitions), before being handed to any consumer; afterwards it is
/// read-only except through the explicit operations that produce a new
/// residue (`transform`, `select`, `translate`).
#[derive(Debug, Clone)]
pub struct Residue {
    atoms: Vec<Atom>,
    /// The PDB entry id.
    pub pdb: String,
    /// The model number.
    pub model: i32,
    /// The author chain identifier.
    pub chain: String,
    /// The component id (residue name), e.g. "A", "ALA".
    pub sequence: String,
    /// The author sequence number.
    pub number: i64,
    /// The label sequence index, when assigned.
    pub index: Option<i64>,
    /// The insertion code, when present.
    pub insertion_code: Option<String>,
    /// The alternate-conformation id, when present.
    pub alt_id: Option<String>,
    /// The symmetry tag of the operator that placed this residue.
    pub symmetry: String,
    /// The chemical classification from the component catalog (e.g. "RNA
    /// linking"), when the component is known.
    pub chem_type: Option<String>,
    /// Whether the parent entity is a polymer.
    pub polymeric: bool,
    rotation: Option<Matrix3<f64>>,
    base_center: Option<Point3<f64>>,
    centers: Centers,
}

impl Residue {
    /// Creates a residue from a finalized atom list.
    ///
    /// Identity fields are taken from the first atom. Returns `None` when
    /// the atom list is empty, since such a residue has no identity.
    pub fn from_atoms(atoms: Vec<Atom>, chem_type: Option<String>) -> Option<Self> {
        let first = atoms.first()?;
        Some(Self {
            pdb: first.pdb.clone(),
            model: first.model,
            chain: first.chain.clone(),
            sequence: first.component_id.clone(),
            number: first.component_number,
            index: first.component_index,
            insertion_code: first.insertion_code.clone(),
            alt_id: first.alt_id.clone(),
            symmetry: first.symmetry.clone(),
            chem_type,
            polymeric: first.polymeric,
            rotation: None,
            base_center: None,
            centers: Centers::default(),
            atoms,
        })
    }

    /// All atoms of this residue, in their finalized order. Inferred
    /// hydrogens, if any, come after the observed atoms.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// The atoms whose name appears in `names`, in atom order.
    pub fn atoms_named<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = &'a Atom> {
        self.atoms
            .iter()
            .filter(move |atom| names.iter().any(|n| n == &atom.name))
    }

    /// The best-fit rotation onto the canonical template, when this residue
    /// was normalizable.
    pub fn rotation(&self) -> Option<&Matrix3<f64>> {
        self.rotation.as_ref()
    }

    /// The fitted reference center, when this residue was normalizable.
    pub fn base_center(&self) -> Option<Point3<f64>> {
        self.base_center
    }

    /// Resolves a named center point. See [`Centers`].
    pub fn center(&self, name: &str) -> Option<Point3<f64>> {
        self.centers.resolve(name, &self.atoms)
    }

    /// The center-group definitions attached to this residue.
    pub fn centers(&self) -> &Centers {
        &self.centers
    }

    /// Checks that every requested atom name is present exactly as often as
    /// it is requested.
    pub fn is_complete(&self, names: &[String]) -> bool {
        self.atoms_named(names).count() == names.len()
    }

    /// The canonical unit id of this residue.
    pub fn unit_id(&self) -> String {
        unit_id::encode(&UnitIdParts {
            pdb: &self.pdb,
            model: self.model,
            chain: &self.chain,
            component_id: &self.sequence,
            number: self.number,
            alt_id: self.alt_id.as_deref(),
            insertion_code: self.insertion_code.as_deref(),
            symmetry: &self.symmetry,
        })
    }

    /// A 4x4 transform mapping world coordinates into this residue's
    /// canonical frame, built from the transpose of the fitted rotation and
    /// the base center. `None` when the residue was not normalizable.
    pub fn standard_transformation(&self) -> Option<Matrix4<f64>> {
        let rotation = self.rotation.as_ref()?;
        let base_center = self.center("base")?;
        let transpose = rotation.transpose();
        let shift = -(transpose * base_center.coords);

        let mut matrix = Matrix4::zeros();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&transpose);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&shift);
        matrix[(3, 3)] = 1.0;
        Some(matrix)
    }

    /// Produces a new residue with identical identity fields and every atom
    /// coordinate passed through an arbitrary 4x4 homogeneous matrix.
    ///
    /// The fitted frame is not recomputed: the new residue has no rotation
    /// or base center. Inferred hydrogens are kept and transformed. Center
    /// group definitions carry over; explicitly set points do not.
    pub fn transform(&self, matrix: &Matrix4<f64>) -> Self {
        let atoms = self.atoms.iter().map(|a| a.transform(matrix)).collect();
        Self {
            atoms,
            rotation: None,
            base_center: None,
            centers: Centers {
                points: HashMap::new(),
                groups: self.centers.groups.clone(),
            },
            chem_type: self.chem_type.clone(),
            ..self.identity_clone()
        }
    }

    /// Produces a new residue restricted to atoms with the given names.
    ///
    /// Coordinates are unchanged, so the fitted frame (if any) remains
    /// valid and is carried over.
    pub fn select(&self, names: &[String]) -> Self {
        let atoms = self.atoms_named(names).cloned().collect();
        Self {
            atoms,
            rotation: self.rotation,
            base_center: self.base_center,
            centers: self.centers.clone(),
            chem_type: self.chem_type.clone(),
            ..self.identity_clone()
        }
    }

    /// Produces a new residue with every atom shifted by `offset`. The
    /// fitted frame shifts along with the atoms.
    pub fn translate(&self, offset: &Vector3<f64>) -> Self {
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(offset);
        let atoms = self.atoms.iter().map(|a| a.transform(&matrix)).collect();

        let mut centers = self.centers.clone();
        for point in centers.points.values_mut() {
            *point += offset;
        }
        Self {
            atoms,
            rotation: self.rotation,
            base_center: self.base_center.map(|c| c + offset),
            centers,
            chem_type: self.chem_type.clone(),
            ..self.identity_clone()
        }
    }

    /// Center-to-center distance between this residue and another, using
    /// the mean of all atoms on both sides.
    pub fn distance(&self, other: &Residue) -> Option<f64> {
        let own = mean_position(self.atoms.iter())?;
        let theirs = mean_position(other.atoms.iter())?;
        Some((own - theirs).norm())
    }

    /// The number of atoms in this residue.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub(crate) fn set_frame(&mut self, rotation: Matrix3<f64>, base_center: Point3<f64>) {
        self.rotation = Some(rotation);
        self.base_center = Some(base_center);
    }

    pub(crate) fn push_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub(crate) fn set_center_point(&mut self, name: &str, point: Point3<f64>) {
        self.centers.set_point(name, point);
    }

    pub(crate) fn define_center_group(&mut self, name: &str, atom_names: Vec<String>) {
        self.centers.define_group(name, atom_names);
    }

    fn identity_clone(&self) -> Self {
        Self {
            atoms: Vec::new(),
            pdb: self.pdb.clone(),
            model: self.model,
            chain: self.chain.clone(),
            sequence: self.sequence.clone(),
            number: self.number,
            index: self.index,
            insertion_code: self.insertion_code.clone(),
            alt_id: self.alt_id.clone(),
            symmetry: self.symmetry.clone(),
            chem_type: None,
            polymeric: self.polymeric,
            rotation: None,
            base_center: None,
            centers: Centers::default(),
        }
    }
}

impl PartialEq for Residue {
    /// Residues compare equal on identity fields alone, not coordinates.
    fn eq(&self, other: &Self) -> bool {
        self.pdb == other.pdb
            && self.model == other.model
            && self.chain == other.chain
            && self.symmetry == other.symmetry
            && self.sequence == other.sequence
            && self.number == other.number
            && self.insertion_code == other.insertion_code
            && self.alt_id == other.alt_id
    }
}
