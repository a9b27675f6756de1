//! Tile symbols and the terrain subset a `Board` stores.
//! Symbol mapping is centralized here so the codec, validation
//! and preview all agree on what each character means.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Tile {
    Empty,       // 'e'
    Wall,        // 'w'
    Target,      // 't' unoccupied
    BoxOnTarget, // 'h'
    Box,         // 'b' off target
    Worker,      // 'p' floor beneath is always empty
}

/// Terrain: what a board cell holds once occupancy is stripped out.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum Terrain {
    #[default]
    Empty,
    Wall,
    Target,
}

impl Tile {
    pub const ALL: [Tile; 6] = [
        Tile::Empty,
        Tile::Wall,
        Tile::Target,
        Tile::BoxOnTarget,
        Tile::Box,
        Tile::Worker,
    ];

    pub fn symbol(self) -> char {
        match self {
            Tile::Empty       => 'e',
            Tile::Wall        => 'w',
            Tile::Target      => 't',
            Tile::BoxOnTarget => 'h',
            Tile::Box         => 'b',
            Tile::Worker      => 'p',
        }
    }

    pub fn from_symbol(c: char) -> Option<Tile> {
        match c {
            'e' => Some(Tile::Empty),
            'w' => Some(Tile::Wall),
            't' => Some(Tile::Target),
            'h' => Some(Tile::BoxOnTarget),
            'b' => Some(Tile::Box),
            'p' => Some(Tile::Worker),
            _   => None,
        }
    }

    /// Terrain symbols are written to the board verbatim; occupancy symbols are not.
    pub fn terrain(self) -> Option<Terrain> {
        match self {
            Tile::Empty  => Some(Terrain::Empty),
            Tile::Wall   => Some(Terrain::Wall),
            Tile::Target => Some(Terrain::Target),
            _ => None,
        }
    }

    /// Does this symbol stand for a box (on or off target)?
    pub fn is_box(self) -> bool {
        matches!(self, Tile::Box | Tile::BoxOnTarget)
    }

    /// Does this symbol mark a target cell, occupied or not?
    pub fn is_target(self) -> bool {
        matches!(self, Tile::Target | Tile::BoxOnTarget)
    }
}

impl Terrain {
    pub fn tile(self) -> Tile {
        match self {
            Terrain::Empty  => Tile::Empty,
            Terrain::Wall   => Tile::Wall,
            Terrain::Target => Tile::Target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_map_back_to_their_tile() {
        for tile in Tile::ALL {
            assert_eq!(Tile::from_symbol(tile.symbol()), Some(tile));
        }
        assert_eq!(Tile::from_symbol('x'), None);
        assert_eq!(Tile::from_symbol('E'), None);
    }

    #[test]
    fn only_floor_wall_and_target_are_terrain() {
        let terrain: Vec<Tile> = Tile::ALL
            .into_iter()
            .filter(|t| t.terrain().is_some())
            .collect();
        assert_eq!(terrain, vec![Tile::Empty, Tile::Wall, Tile::Target]);
        assert!(Tile::BoxOnTarget.is_target());
        assert!(Tile::BoxOnTarget.is_box());
        assert!(!Tile::Worker.is_box());
    }
}
