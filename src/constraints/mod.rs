mod distance;

pub use self::distance::DistanceJointDef;
