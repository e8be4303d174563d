pub const EXAMPLE_SCRIPT: &str = "DRIVE 24 110 1.0
TURN 90 90 2.0
INTAKE 1000 127
DELAY 500
CLAMP OPEN";

pub const EXAMPLE_FUNCTION_NAME: &str = "example_auton";
