use crate::tree_sequence::{TreeSequence, NodeId};

/// Genotype calls of a set of haplotype nodes at a single site.
///
/// `alleles[0]` is always the ancestral state. Derived states follow, in mutation table order, without
/// duplicates. `genotypes[i]` indexes into `alleles` and refers to the i-th requested node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub site     : usize,
    pub position : usize,
    pub alleles  : Vec<String>,
    pub genotypes: Vec<usize>,
}

impl Variant {
    /// Allelic state carried by the i-th haplotype.
    pub fn allele_of(&self, haplotype: usize) -> Option<&str> {
        self.genotypes.get(haplotype)
            .and_then(|allele| self.alleles.get(*allele))
            .map(String::as_str)
    }
}

/// Site-by-site genotype iterator. See [`TreeSequence::variants`].
pub struct Variants<'ts> {
    ts     : &'ts TreeSequence,
    samples: Vec<NodeId>,
    site   : usize,
}

impl<'ts> Variants<'ts> {
    pub(crate) fn new(ts: &'ts TreeSequence, samples: &[NodeId]) -> Self {
        Self { ts, samples: samples.to_vec(), site: 0 }
    }

    fn decode(&self, site: usize) -> Variant {
        let x = self.ts.sites()[site].position;

        // ---- Allele list + (node, allele) pairs. Later mutations on the same node take precedence.
        let mut alleles = vec![self.ts.sites()[site].ancestral_state.clone()];
        let mut mutated: Vec<(NodeId, usize)> = Vec::new();
        for row in self.ts.site_mutations(site) {
            let mutation = &self.ts.mutations()[*row];
            let allele = match alleles.iter().position(|a| *a == mutation.derived_state) {
                Some(idx) => idx,
                None      => {alleles.push(mutation.derived_state.clone()); alleles.len() - 1},
            };
            match mutated.iter_mut().find(|(node, _)| *node == mutation.node) {
                Some(entry) => entry.1 = allele,
                None        => mutated.push((mutation.node, allele)),
            }
        }

        // ---- Each sample inherits the state of its closest mutated ancestor.
        let genotypes = self.samples.iter().map(|sample| {
            let mut node = Some(*sample);
            while let Some(u) = node {
                if let Some((_, allele)) = mutated.iter().find(|(n, _)| *n == u) {
                    return *allele
                }
                node = self.ts.parent(u, x);
            }
            0
        }).collect();

        Variant { site, position: self.ts.discrete_position(site), alleles, genotypes }
    }
}

impl Iterator for Variants<'_> {
    type Item = Variant;

    fn next(&mut self) -> Option<Self::Item> {
        if self.site >= self.ts.sites().len() {
            return None
        }
        let variant = self.decode(self.site);
        self.site += 1;
        Some(variant)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ts.sites().len().saturating_sub(self.site);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Variants<'_> {}
