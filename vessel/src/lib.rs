mod cylindrical_tank;
pub use crate::cylindrical_tank::CylindricalTank;

mod level;
pub use crate::level::Level;

mod tank;
pub use crate::tank::Tank;
