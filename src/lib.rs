pub mod configuration;
pub mod configurationerror;

pub mod fuzzy {
    pub mod membershipfunction;
    pub mod norm;
    pub mod ageband;
    pub mod variable;
    pub mod fuzzifier;

    pub mod rule {
        pub mod antecedent;
        pub mod consequent;
        pub mod rule;
        pub mod rulebase;
    }
}

pub mod inference {
    pub mod riskinput;
    pub mod inferenceengine;
    pub mod inferenceoutcome;
    pub mod gridevaluator;

    pub mod mamdani {
        pub mod defuzzification;
        pub mod mamdaniengine;
    }

    pub mod sugeno {
        pub mod sugenoengine;
    }
}

pub mod manager {
    pub mod namedobject;
    pub mod manager;
}

pub mod math {
    pub mod domain;
    pub mod curve {
        pub mod curve;
        pub mod sampledcurve;
    }
}
