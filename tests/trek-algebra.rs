//! Tests for subtraction and addition of treks.

use lineage::{trek, Path, Trek};

/// Asserts the stride and the trail of a trek.
fn assert_shape(trek: &Trek, stride: Option<isize>, trail: &[usize]) {
    assert_eq!(trek.stride(), stride, "stride of {trek}");
    assert_eq!(trek.trail(), trail, "trail of {trek}");
}

mod construction {
    use super::*;

    #[test]
    fn absolute() {
        let path = Trek::absolute([0, 1, 2]);
        assert_shape(&path, Some(0), &[0, 1, 2]);
        assert!(path.is_absolute());
        assert!(!path.is_identity());
        assert!(path.is_related());
    }

    #[test]
    fn identity() {
        let root = Trek::identity();
        assert_shape(&root, Some(0), &[]);
        assert!(root.is_identity());
        assert!(!root.is_absolute());
        assert!(root.is_related());
    }

    #[test]
    fn unrelated() {
        let unrelated = Trek::unrelated();
        assert_shape(&unrelated, None, &[]);
        assert!(unrelated.is_unrelated());
        assert!(!unrelated.is_related());
        assert_eq!(unrelated.magnitude(), None);
    }

    #[test]
    fn descendant() {
        let delta = Trek::descendant([2, 3]);
        assert_shape(&delta, Some(2), &[2, 3]);
        assert!(delta.is_descendant());
        assert!(!delta.is_ancestor());
    }

    #[test]
    fn ancestor() {
        let delta = Trek::ancestor([2, 3]);
        assert_shape(&delta, Some(-2), &[2, 3]);
        assert_eq!(delta.magnitude(), Some(2));
        assert!(delta.is_ancestor());
        assert!(!delta.is_descendant());
    }
}

mod subtraction {
    use super::*;

    #[test]
    fn same_node_is_identity() {
        let path = Trek::absolute([0, 1, 2]);
        assert_eq!(&path - &path, Trek::Identity);
    }

    #[test]
    fn toward_descendant_is_positive() {
        let ancestor = Trek::absolute([0, 1]);
        let descendant = Trek::absolute([0, 1, 2, 3]);
        assert_shape(&(&descendant - &ancestor), Some(2), &[2, 3]);
    }

    #[test]
    fn toward_ancestor_is_negative() {
        let ancestor = Trek::absolute([0, 1]);
        let descendant = Trek::absolute([0, 1, 2, 3]);
        assert_shape(&(&ancestor - &descendant), Some(-2), &[2, 3]);
    }

    #[test]
    fn divergent_paths_are_unrelated() {
        // Siblings.
        assert!((Trek::absolute([0, 1, 2]) - Trek::absolute([0, 1, 3])).is_unrelated());
        // Cousins.
        assert!((Trek::absolute([0, 1, 2, 5]) - Trek::absolute([0, 1, 3, 6])).is_unrelated());
        // Different first index.
        assert!((Trek::absolute([0, 1, 2]) - Trek::absolute([1, 2, 3])).is_unrelated());
    }

    #[test]
    fn unrelated_operand() {
        let path = Trek::absolute([0, 1, 2]);
        assert_eq!(&path - &Trek::Unrelated, Trek::Unrelated);
        assert_eq!(&Trek::Unrelated - &path, Trek::Unrelated);
    }

    #[test]
    fn stride_matches_trail_length() {
        let ancestor = Trek::absolute([0, 1]);
        let descendant = Trek::absolute([0, 1, 2, 3, 4]);

        let down = &descendant - &ancestor;
        assert_eq!(down.magnitude(), Some(down.trail().len()));
        let up = &ancestor - &descendant;
        assert_eq!(up.magnitude(), Some(up.trail().len()));
        assert_eq!(down.trail(), up.trail());
    }

    #[test]
    fn identity_against_absolute() {
        let deep = Trek::absolute([0, 1, 2]);
        assert_shape(&(&Trek::Identity - &deep), Some(-3), &[0, 1, 2]);
        assert_shape(&(&deep - &Trek::Identity), Some(3), &[0, 1, 2]);
    }

    #[test]
    fn single_segment() {
        let a = Trek::absolute([0]);
        let b = Trek::absolute([0, 1]);
        assert_shape(&(&b - &a), Some(1), &[1]);
        assert_shape(&(&a - &b), Some(-1), &[1]);
    }

    #[test]
    fn descendants() {
        let longer = Trek::descendant([2, 3, 4]);
        let shorter = Trek::descendant([2]);
        assert_eq!(&longer - &longer, Trek::Identity);
        assert_shape(&(&longer - &shorter), Some(2), &[3, 4]);
        assert_shape(&(&shorter - &longer), Some(-2), &[3, 4]);
        assert!((Trek::descendant([2, 3]) - Trek::descendant([2, 4])).is_unrelated());
    }

    #[test]
    fn ancestors() {
        let longer = Trek::ancestor([2, 3, 4]);
        let shorter = Trek::ancestor([2]);
        assert_eq!(&longer - &longer, Trek::Identity);
        assert_shape(&(&longer - &shorter), Some(-2), &[3, 4]);
        assert_shape(&(&shorter - &longer), Some(2), &[3, 4]);
    }

    #[test]
    fn mixed_directions_are_unrelated() {
        let down = Trek::descendant([2, 3]);
        let up = Trek::ancestor([2, 3]);
        assert!((&down - &up).is_unrelated());
        assert!((&up - &down).is_unrelated());
        assert!((&down - &Trek::absolute([2, 3])).is_unrelated());
    }

    #[test]
    fn free_function_on_paths() {
        let clicked = Path::from([0, 1, 2]);
        assert_eq!(trek::subtract(&clicked, &clicked), Trek::Identity);
        assert_eq!(
            trek::subtract(&Path::from([0, 1]), &clicked),
            Trek::ancestor([2])
        );
        assert_eq!(
            trek::subtract(&Path::from([0, 1, 3]), &clicked),
            Trek::Unrelated
        );
    }
}

mod addition {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let path = Trek::absolute([0, 1, 2]);
        assert_eq!(&path + &Trek::Identity, path);
        assert_eq!(&Trek::Identity + &path, path);
        let delta = Trek::ancestor([4]);
        assert_eq!(&Trek::Identity + &delta, delta);
        let delta = Trek::descendant([4]);
        assert_eq!(&delta + &Trek::Identity, delta);
    }

    #[test]
    fn descending_from_the_root() {
        let root = Path::root();
        let target = Path::from([1, 2]);
        let delta = trek::subtract(&target, &root);
        assert_eq!(delta, Trek::descendant([1, 2]));
        assert_eq!(
            trek::add(&Trek::absolute(root.clone()), &delta),
            Trek::absolute(target.clone())
        );

        let back = trek::subtract(&root, &target);
        assert_eq!(trek::add(&Trek::absolute(target), &back), Trek::absolute(root));
    }

    #[test]
    fn absolute_and_descendant() {
        assert_eq!(
            Trek::absolute([0, 1]) + Trek::descendant([2, 3]),
            Trek::absolute([0, 1, 2, 3])
        );
    }

    #[test]
    fn absolute_and_ancestor() {
        let base = Trek::absolute([0, 1, 2, 3]);
        assert_eq!(&base + &Trek::ancestor([2, 3]), Trek::absolute([0, 1]));
        assert_eq!(&base + &Trek::ancestor([0, 1, 2, 3]), Trek::Identity);
        assert!((&base + &Trek::ancestor([9, 9])).is_unrelated());
    }

    #[test]
    fn unrelated_operand() {
        let path = Trek::absolute([0, 1, 2]);
        assert_eq!(&path + &Trek::Unrelated, Trek::Unrelated);
        assert_eq!(&Trek::Unrelated + &path, Trek::Unrelated);
    }

    #[test]
    fn descendants_concatenate() {
        let result = Trek::descendant([2, 3]) + Trek::descendant([4]);
        assert_shape(&result, Some(3), &[2, 3, 4]);
    }

    #[test]
    fn ancestors_combine_outermost_first() {
        let result = Trek::ancestor([3]) + Trek::ancestor([2]);
        assert_shape(&result, Some(-2), &[2, 3]);
    }

    #[test]
    fn descendant_then_ancestor() {
        let down = Trek::descendant([2, 3]);
        assert_shape(&(&down + &Trek::ancestor([3])), Some(1), &[2]);
        assert_eq!(&down + &Trek::ancestor([2, 3]), Trek::Identity);
        assert_eq!(&down + &Trek::ancestor([9]), Trek::Unrelated);
        assert_eq!(&down + &Trek::ancestor([1, 2, 3]), Trek::Unrelated);
    }

    #[test]
    fn ancestor_then_descendant() {
        let up = Trek::ancestor([3]);
        assert_shape(&(&up + &Trek::descendant([3, 4])), Some(1), &[4]);
        assert_eq!(&up + &Trek::descendant([3]), Trek::Identity);
        assert_eq!(&up + &Trek::descendant([9, 9]), Trek::Unrelated);
    }

    #[test]
    fn absolute_on_the_right_is_unrelated() {
        assert!((Trek::absolute([0, 1]) + Trek::absolute([2, 3])).is_unrelated());
        assert!((Trek::descendant([2, 3]) + Trek::absolute([0, 1])).is_unrelated());
        assert!((Trek::ancestor([2]) + Trek::absolute([0, 1])).is_unrelated());
    }

    #[test]
    fn free_function() {
        let base = Trek::absolute([0, 1]);
        assert_eq!(
            trek::add(&base, &Trek::descendant([5])),
            Trek::absolute([0, 1, 5])
        );
    }
}

mod round_trip {
    use super::*;

    /// Asserts `b + (a - b) == a`.
    fn assert_round_trip(a: &[usize], b: &[usize]) {
        let (a, b) = (Trek::absolute(a), Trek::absolute(b));
        let delta = &a - &b;
        assert_eq!(&b + &delta, a, "delta {delta}");
    }

    #[test]
    fn descendant() {
        assert_round_trip(&[0, 1, 2, 3], &[0, 1]);
    }

    #[test]
    fn ancestor() {
        assert_round_trip(&[0, 1], &[0, 1, 2, 3]);
    }

    #[test]
    fn same_node() {
        assert_round_trip(&[0, 1, 2], &[0, 1, 2]);
    }

    #[test]
    fn antisymmetry() {
        let a = Trek::absolute([0, 1, 2, 3]);
        let b = Trek::absolute([0, 1]);
        let (ab, ba) = (&a - &b, &b - &a);
        assert_eq!(ab.magnitude(), ba.magnitude());
        assert_eq!(ab.stride(), ba.stride().map(|s| -s));
        assert_eq!(ab.trail(), ba.trail());
    }
}

/// Colouring nodes relative to a clicked node only looks at the stride sign.
mod highlighting {
    use super::*;

    fn stride(mine: &[usize], clicked: &[usize]) -> Option<isize> {
        trek::subtract(&Path::from(mine), &Path::from(clicked)).stride()
    }

    #[test]
    fn by_relation() {
        assert!(stride(&[0, 1], &[0, 1, 2, 3]).map_or(false, |d| d < 0));
        assert!(stride(&[0, 1, 2, 3], &[0, 1]).map_or(false, |d| d > 0));
        assert_eq!(stride(&[0, 1, 2], &[0, 1, 2]), Some(0));
        assert_eq!(stride(&[0, 1, 2], &[0, 1, 3]), None);
    }
}

#[test]
fn operations_are_total() {
    let cases = [
        Trek::Identity,
        Trek::Unrelated,
        Trek::absolute([0, 1, 2]),
        Trek::descendant([2, 3]),
        Trek::ancestor([2, 3]),
    ];
    for a in &cases {
        for b in &cases {
            let difference = a - b;
            let sum = a + b;
            // Variants keep their trails non-empty.
            for result in [&difference, &sum] {
                assert_eq!(
                    result.trail().is_empty(),
                    result.is_identity() || result.is_unrelated(),
                    "{a} and {b} gave {result}"
                );
            }
        }
    }
}
