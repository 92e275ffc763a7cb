// VCF2GENO - Convert VCF genotypes into analysis-ready tables
// Copyright (C) 2024  Osma S. Rautila
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use std::collections::BTreeSet;

use color_eyre::{eyre::eyre, Result};

use crate::args::RemoveFields;
use crate::error::Vcf2GenoError::UnknownFieldError;

/// The fixed columns preceding the samples in every VCF record
pub const STANDARD_FIELDS: [&str; 9] = [
    "CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

pub const N_STANDARD_FIELDS: usize = STANDARD_FIELDS.len();

pub fn standard_field_index(name: &str) -> Option<usize> {
    STANDARD_FIELDS.iter().position(|field| *field == name)
}

/// Removes a fixed set of columns from every row of a file.
///
/// The keep-mask is built once from the header and applied in a single pass per row,
/// so the header and all data rows stay aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProjector {
    keep: Vec<bool>,
}

impl FieldProjector {
    /// Build a mask of `width` columns. Indices outside of the row are ignored.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>, width: usize) -> Self {
        let mut keep = vec![true; width];
        for i in indices {
            if let Some(k) = keep.get_mut(i) {
                *k = false;
            }
        }
        Self { keep }
    }

    /// Resolve field and sample names against the `#CHROM` header columns
    pub fn resolve(remove: &RemoveFields, header: &[&str]) -> Result<Self> {
        let samples = header.get(N_STANDARD_FIELDS..).unwrap_or_default();

        let indices = remove
            .names()
            .iter()
            .map(|name| {
                standard_field_index(name)
                    .or_else(|| {
                        samples
                            .iter()
                            .position(|s| *s == name.as_str())
                            .map(|i| i + N_STANDARD_FIELDS)
                    })
                    .ok_or_else(|| eyre!(UnknownFieldError(name.clone())))
            })
            .collect::<Result<BTreeSet<usize>>>()?;

        Ok(Self::from_indices(indices, header.len()))
    }

    /// Sorted column indices that are removed
    pub fn removed(&self) -> Vec<usize> {
        self.keep
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| (!keep).then_some(i))
            .collect()
    }

    pub fn is_identity(&self) -> bool {
        self.keep.iter().all(|keep| *keep)
    }

    /// Kept fields in their original order. Columns past the mask are kept.
    pub fn project<'a, T: AsRef<str>>(
        &'a self,
        fields: &'a [T],
    ) -> impl Iterator<Item = &'a str> + 'a {
        fields
            .iter()
            .enumerate()
            .filter(|(i, _)| self.keep.get(*i).copied().unwrap_or(true))
            .map(|(_, field)| field.as_ref())
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::error::Vcf2GenoError;

    const HEADER: [&str; 12] = [
        "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT", "S1", "S2", "S3",
    ];

    #[test]
    fn test_standard_field_index() {
        assert_eq!(standard_field_index("CHROM"), Some(0));
        assert_eq!(standard_field_index("FORMAT"), Some(8));
        assert_eq!(standard_field_index("chrom"), None);
    }

    #[test]
    fn test_resolve_fields_and_samples() {
        let remove: RemoveFields = "QUAL:INFO:S2:FILTER".parse().unwrap();
        let projector = FieldProjector::resolve(&remove, &HEADER).unwrap();
        assert_eq!(projector.removed(), [5, 6, 7, 10]);

        let kept: Vec<_> = projector.project(&HEADER).collect();
        assert_eq!(kept, ["#CHROM", "POS", "ID", "REF", "ALT", "FORMAT", "S1", "S3"]);
    }

    #[test]
    fn test_resolve_unknown_field() {
        let remove: RemoveFields = "QUAL:S9".parse().unwrap();
        let err = FieldProjector::resolve(&remove, &HEADER).unwrap_err();
        assert_eq!(err.downcast_ref::<Vcf2GenoError>(), Some(&UnknownFieldError("S9".into())));
    }

    #[test]
    fn test_resolve_empty_is_identity() {
        let projector = FieldProjector::resolve(&RemoveFields::default(), &HEADER).unwrap();
        assert!(projector.is_identity());
        assert_eq!(projector.project(&HEADER).count(), HEADER.len());
    }

    #[test]
    fn test_out_of_range_indices_are_ignored() {
        let projector = FieldProjector::from_indices([1, 3, 50, 100], 4);
        let row = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let kept: Vec<_> = projector.project(&row).collect();
        assert_eq!(kept, ["a", "c"]);

        let short = ["a"];
        assert_eq!(projector.project(&short).collect::<Vec<_>>(), ["a"]);
    }

    #[test]
    fn test_projection_size_and_order() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let len = rng.gen_range(0..30);
            let row: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            let indices: BTreeSet<usize> = (0..rng.gen_range(0..10)).map(|_| rng.gen_range(0..40)).collect();
            let valid = indices.iter().filter(|i| **i < len).count();

            let projector = FieldProjector::from_indices(indices.clone(), len);
            let kept: Vec<usize> = projector.project(&row).map(|f| f.parse().unwrap()).collect();

            assert_eq!(kept.len(), len - valid);
            assert!(kept.windows(2).all(|w| w[0] < w[1]));
            assert!(kept.iter().all(|i| !indices.contains(i)));
        }
    }
}
