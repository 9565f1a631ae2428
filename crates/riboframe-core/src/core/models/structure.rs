use super::residue::Residue;

/// One chain of a model: an ordered list of residues sharing an author
/// chain identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    /// The author chain identifier (e.g. "A").
    pub id: String,
    residues: Vec<Residue>,
}

impl Chain {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// One model of a structure, holding chains in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// The model number from the source file.
    pub number: i32,
    chains: Vec<Chain>,
}

impl Model {
    fn new(number: i32) -> Self {
        Self {
            number,
            chains: Vec::new(),
        }
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    fn chain_mut(&mut self, id: &str) -> &mut Chain {
        if let Some(index) = self.chains.iter().position(|c| c.id == id) {
            return &mut self.chains[index];
        }
        self.chains.push(Chain::new(id));
        let last = self.chains.len() - 1;
        &mut self.chains[last]
    }
}

/// The loaded hierarchy: structure, models, chains, ordered residues.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// The PDB entry id.
    pub pdb: String,
    models: Vec<Model>,
}

impl Structure {
    /// Builds the hierarchy from an ordered residue list, creating models
    /// and chains in first-seen order.
    pub fn from_residues(pdb: &str, residues: Vec<Residue>) -> Self {
        let mut models: Vec<Model> = Vec::new();
        for residue in residues {
            let model = match models.iter().position(|m| m.number == residue.model) {
                Some(index) => &mut models[index],
                None => {
                    models.push(Model::new(residue.model));
                    let last = models.len() - 1;
                    &mut models[last]
                }
            };
            let chain = residue.chain.clone();
            model.chain_mut(&chain).residues.push(residue);
        }
        Self {
            pdb: pdb.to_string(),
            models,
        }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model(&self, number: i32) -> Option<&Model> {
        self.models.iter().find(|m| m.number == number)
    }

    /// Iterates every residue of every model and chain, in hierarchy order.
    pub fn residues(&self) -> impl Iterator<Item = &Residue> {
        self.models
            .iter()
            .flat_map(|m| m.chains.iter())
            .flat_map(|c| c.residues.iter())
    }

    /// Total number of residues across all models.
    pub fn len(&self) -> usize {
        self.residues().count()
    }

    pub fn is_empty(&self) -> bool {
        self.models.iter().all(|m| m.chains.is_empty())
    }
}
