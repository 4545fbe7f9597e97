//! Track fault classifier
//!
//! Maps the two IR sensor bits onto one of four fault classes. The
//! exported decision tree splits on the right sensor first and the left
//! sensor second, both at the 0.5 midpoint. With binary inputs the tree
//! collapses into a 4-entry table indexed by `left | right << 1`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw readings of the two track sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureVector {
    /// Left sensor tripped
    pub left: bool,
    /// Right sensor tripped
    pub right: bool,
}

impl FeatureVector {
    /// Create a feature vector from two sensor states
    pub const fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }

    /// Create a feature vector from raw digital reads
    ///
    /// Any non-zero value is above the 0.5 split threshold.
    pub const fn from_raw(left: u8, right: u8) -> Self {
        Self {
            left: left != 0,
            right: right != 0,
        }
    }

    /// Two-bit table index: bit 0 = left, bit 1 = right
    pub const fn index(&self) -> usize {
        (self.left as usize) | ((self.right as usize) << 1)
    }

    /// Left reading as a digital level (0 or 1)
    pub const fn left_level(&self) -> u8 {
        self.left as u8
    }

    /// Right reading as a digital level (0 or 1)
    pub const fn right_level(&self) -> u8 {
        self.right as u8
    }
}

/// Track condition classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultClass {
    /// Both sensors clear
    Normal,
    /// Crack under the left sensor (class 1)
    CrackLeft,
    /// Crack under the right sensor (class 2)
    CrackRight,
    /// Both sensors tripped, rail broken (class 3)
    Break,
}

/// Leaf table, indexed by [`FeatureVector::index`]
const LEAVES: [FaultClass; 4] = [
    FaultClass::Normal,     // left=0, right=0
    FaultClass::CrackLeft,  // left=1, right=0
    FaultClass::CrackRight, // left=0, right=1
    FaultClass::Break,      // left=1, right=1
];

impl FaultClass {
    /// Numeric class id as produced by the exported model
    pub const fn id(&self) -> u8 {
        match self {
            FaultClass::Normal => 0,
            FaultClass::CrackLeft => 1,
            FaultClass::CrackRight => 2,
            FaultClass::Break => 3,
        }
    }

    /// Parse a class from its numeric id
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(FaultClass::Normal),
            1 => Some(FaultClass::CrackLeft),
            2 => Some(FaultClass::CrackRight),
            3 => Some(FaultClass::Break),
            _ => None,
        }
    }

    /// Dashboard label
    pub const fn label(&self) -> &'static str {
        match self {
            FaultClass::Normal => "Normal",
            FaultClass::CrackLeft => "Crack_Left",
            FaultClass::CrackRight => "Crack_Right",
            FaultClass::Break => "Break",
        }
    }

    /// Check if this class is a fault (anything but Normal)
    pub const fn is_fault(&self) -> bool {
        !matches!(self, FaultClass::Normal)
    }

    /// Check if this class is one of the crack classes
    pub const fn is_crack(&self) -> bool {
        matches!(self, FaultClass::CrackLeft | FaultClass::CrackRight)
    }
}

/// Classify a sensor reading
pub const fn classify(features: FeatureVector) -> FaultClass {
    LEAVES[features.index()]
}

/// Classify raw digital reads (non-zero = tripped)
pub const fn classify_raw(left: u8, right: u8) -> FaultClass {
    classify(FeatureVector::from_raw(left, right))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nested form of the exported tree, kept to check the table against
    fn tree(left: f32, right: f32) -> u8 {
        if right <= 0.5 {
            if left <= 0.5 {
                0
            } else {
                1
            }
        } else if left <= 0.5 {
            2
        } else {
            3
        }
    }

    #[test]
    fn test_truth_table() {
        assert_eq!(classify(FeatureVector::new(false, false)), FaultClass::Normal);
        assert_eq!(classify(FeatureVector::new(true, false)), FaultClass::CrackLeft);
        assert_eq!(classify(FeatureVector::new(false, true)), FaultClass::CrackRight);
        assert_eq!(classify(FeatureVector::new(true, true)), FaultClass::Break);
    }

    #[test]
    fn test_table_matches_tree() {
        for left in [false, true] {
            for right in [false, true] {
                let expected = tree(left as u8 as f32, right as u8 as f32);
                let class = classify(FeatureVector::new(left, right));
                assert_eq!(class.id(), expected);
            }
        }
    }

    #[test]
    fn test_raw_reads_nonzero_is_tripped() {
        assert_eq!(classify_raw(0, 0), FaultClass::Normal);
        assert_eq!(classify_raw(1, 0), FaultClass::CrackLeft);
        assert_eq!(classify_raw(0, 255), FaultClass::CrackRight);
        assert_eq!(classify_raw(7, 3), FaultClass::Break);
    }

    #[test]
    fn test_index_layout() {
        assert_eq!(FeatureVector::new(false, false).index(), 0);
        assert_eq!(FeatureVector::new(true, false).index(), 1);
        assert_eq!(FeatureVector::new(false, true).index(), 2);
        assert_eq!(FeatureVector::new(true, true).index(), 3);
    }

    #[test]
    fn test_class_ids() {
        for id in 0..4 {
            let class = FaultClass::from_id(id).unwrap();
            assert_eq!(class.id(), id);
        }
        assert!(FaultClass::from_id(4).is_none());
    }

    #[test]
    fn test_labels() {
        assert_eq!(FaultClass::Normal.label(), "Normal");
        assert_eq!(FaultClass::CrackLeft.label(), "Crack_Left");
        assert_eq!(FaultClass::CrackRight.label(), "Crack_Right");
        assert_eq!(FaultClass::Break.label(), "Break");
    }

    #[test]
    fn test_fault_predicates() {
        assert!(!FaultClass::Normal.is_fault());
        assert!(FaultClass::CrackLeft.is_fault());
        assert!(FaultClass::CrackRight.is_crack());
        assert!(FaultClass::Break.is_fault());
        assert!(!FaultClass::Break.is_crack());
    }
}
