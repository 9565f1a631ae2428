//! Frame fitting, hydrogen inference, and center assignment per residue.

use nalgebra::Point3;

use super::diagnostics::Diagnostics;
use crate::core::geometry::best_transformation;
use crate::core::models::{Atom, Residue};
use crate::core::templates::TemplateRegistry;

/// Normalizes one residue in place.
///
/// A residue matching a standard or modified template gets a best-fit
/// rotation and a base center; a standard residue additionally gets its
/// template hydrogens placed in world space. Residues without a template are
/// left untouched except for center-group definitions, which apply to every
/// component the built-in group tables know about.
///
/// Failure to fit a frame (too few matched atoms, degenerate geometry) is
/// recorded as a warning, never an error; the residue simply stays
/// unnormalized.
pub fn normalize_residue(
    residue: &mut Residue,
    templates: &TemplateRegistry,
    diagnostics: &mut Diagnostics,
) {
    fit_frame(residue, templates, diagnostics);
    infer_hydrogens(residue, templates, diagnostics);
    assign_centers(residue, templates);
}

fn fit_frame(residue: &mut Residue, templates: &TemplateRegistry, diagnostics: &mut Diagnostics) {
    let Some(matched) = matched_pairs(residue, templates) else {
        return;
    };
    let (observed, reference, standard) = matched;

    if observed.len() < 3 {
        diagnostics.warn(
            "frames",
            format!(
                "residue {} matches only {} template atoms; skipping frame fit",
                residue.unit_id(),
                observed.len()
            ),
        );
        return;
    }

    let fit = match best_transformation(&observed, &reference) {
        Ok(fit) => fit,
        Err(error) => {
            diagnostics.warn(
                "frames",
                format!("frame fit failed for residue {}: {error}", residue.unit_id()),
            );
            return;
        }
    };

    // Standard templates are laid out with their heavy-atom mean at the
    // origin, so the observed centroid is the center. Modified residues may
    // match only part of the template, so the reference centroid has to be
    // mapped back out.
    let base_center = if standard {
        fit.centroid_first
    } else {
        Point3::from(fit.centroid_first.coords - fit.rotation * fit.centroid_second.coords)
    };
    residue.set_frame(fit.rotation, base_center);
}

/// Pairs observed atom positions with their template coordinates.
///
/// Returns the observed set, the reference set, and whether the match went
/// through a standard template directly. `None` when no template applies.
fn matched_pairs(
    residue: &Residue,
    templates: &TemplateRegistry,
) -> Option<(Vec<Point3<f64>>, Vec<Point3<f64>>, bool)> {
    let mut observed = Vec::new();
    let mut reference = Vec::new();

    if let Some(template) = templates.standard(&residue.sequence) {
        for atom in residue.atoms() {
            if !template.heavy_atoms.iter().any(|n| n == &atom.name) {
                continue;
            }
            if let Some(coordinate) = template.coordinate(&atom.name) {
                observed.push(atom.position);
                reference.push(coordinate);
            }
        }
        return Some((observed, reference, true));
    }

    let modified = templates.modified(&residue.sequence)?;
    let template = templates.standard(&modified.standard)?;
    for atom in residue.atoms() {
        let Some(standard_name) = modified.atoms.get(&atom.name) else {
            continue;
        };
        if let Some(coordinate) = template.coordinate(standard_name) {
            observed.push(atom.position);
            reference.push(coordinate);
        }
    }
    Some((observed, reference, false))
}

fn infer_hydrogens(
    residue: &mut Residue,
    templates: &TemplateRegistry,
    diagnostics: &mut Diagnostics,
) {
    let Some(template) = templates.standard(&residue.sequence) else {
        return;
    };
    let (Some(rotation), Some(base_center)) = (residue.rotation().copied(), residue.base_center())
    else {
        return;
    };

    let mut missing = Vec::new();
    let mut inferred = Vec::new();
    for name in &template.hydrogens {
        match template.coordinate(name) {
            Some(offset) => {
                let position = base_center + rotation * offset.coords;
                inferred.push(Atom::hydrogen(name, position));
            }
            None => missing.push(name.as_str()),
        }
    }
    if !missing.is_empty() {
        diagnostics.warn(
            "frames",
            format!(
                "residue {} template lacks coordinates for hydrogens [{}]",
                residue.unit_id(),
                missing.join(", ")
            ),
        );
    }
    for atom in inferred {
        residue.push_atom(atom);
    }
}

fn assign_centers(residue: &mut Residue, templates: &TemplateRegistry) {
    if let Some(base_center) = residue.base_center() {
        residue.set_center_point("base", base_center);
    }
    for (group, atoms) in templates.center_groups(&residue.sequence) {
        residue.define_center_group(&group, atoms);
    }
}
