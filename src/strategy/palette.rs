use crate::session::Compound;

/// Colour used to draw a compound on the tire strategy chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompoundColor {
    Red,
    Yellow,
    White,
    Green,
    Blue,
    Gray,
}

impl From<Compound> for CompoundColor {
    fn from(compound: Compound) -> Self {
        match compound {
            Compound::Soft => CompoundColor::Red,
            Compound::Medium => CompoundColor::Yellow,
            Compound::Hard => CompoundColor::White,
            Compound::Intermediate => CompoundColor::Green,
            Compound::Wet => CompoundColor::Blue,
            Compound::Unknown => CompoundColor::Gray,
        }
    }
}

impl CompoundColor {
    pub fn name(&self) -> &'static str {
        match self {
            CompoundColor::Red => "red",
            CompoundColor::Yellow => "yellow",
            CompoundColor::White => "white",
            CompoundColor::Green => "green",
            CompoundColor::Blue => "blue",
            CompoundColor::Gray => "gray",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            CompoundColor::Red => (255, 0, 0),
            CompoundColor::Yellow => (255, 255, 0),
            CompoundColor::White => (255, 255, 255),
            CompoundColor::Green => (0, 128, 0),
            CompoundColor::Blue => (0, 0, 255),
            CompoundColor::Gray => (128, 128, 128),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_colors() {
        let names = Compound::ALL
            .iter()
            .map(|c| CompoundColor::from(*c).name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["red", "yellow", "white", "green", "blue", "gray"]);
    }

    #[test]
    fn test_unknown_falls_back_to_gray() {
        assert_eq!(CompoundColor::from(Compound::Unknown), CompoundColor::Gray);
        assert_eq!(CompoundColor::Gray.rgb(), (128, 128, 128));
    }
}
