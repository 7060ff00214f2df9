use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// One of the five clearable animal kinds.
///
/// Animals are the only tiles that form clearable regions. Each animal also
/// belongs to a display group ("flock", "herd", "sounder") that carries no
/// gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum Animal {
    Sheep = 0,
    Goat = 1,
    Chicken = 2,
    Cow = 3,
    Pig = 4,
}

impl Distribution<Animal> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Animal {
        Animal::ALL[rng.random_range(0..Animal::LEN)]
    }
}

impl Animal {
    /// Number of animal kinds (5).
    pub const LEN: usize = 5;

    /// All animals in their canonical order.
    pub const ALL: [Animal; Self::LEN] = [
        Animal::Sheep,
        Animal::Goat,
        Animal::Chicken,
        Animal::Cow,
        Animal::Pig,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Collective noun shown next to a cleared region.
    #[must_use]
    pub const fn group_name(self) -> &'static str {
        match self {
            Animal::Sheep | Animal::Chicken => "flock",
            Animal::Goat | Animal::Cow => "herd",
            Animal::Pig => "sounder",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Animal::Sheep => "🐑",
            Animal::Goat => "🐐",
            Animal::Chicken => "🐔",
            Animal::Cow => "🐄",
            Animal::Pig => "🐖",
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Animal::Sheep => 'S',
            Animal::Goat => 'G',
            Animal::Chicken => 'C',
            Animal::Cow => 'M',
            Animal::Pig => 'P',
        }
    }
}

/// The identity painted on a single board cell.
///
/// `Empty` is the only passable value for collision purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Tile {
    #[default]
    Empty,
    Animal(Animal),
    Wolf,
    BlackSheep,
}

impl Tile {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Tile::Empty)
    }

    /// Returns the animal kind when this tile can take part in a clearable region.
    #[must_use]
    pub const fn animal(self) -> Option<Animal> {
        match self {
            Tile::Animal(animal) => Some(animal),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Tile::Empty => "",
            Tile::Animal(animal) => animal.label(),
            Tile::Wolf => "🐺",
            Tile::BlackSheep => "🐑‍⬛",
        }
    }

    /// Returns the single character used by ASCII board art.
    ///
    /// # Examples
    ///
    /// ```
    /// use herdfall_engine::{Animal, Tile};
    ///
    /// assert_eq!(Tile::Empty.as_char(), '.');
    /// assert_eq!(Tile::Animal(Animal::Goat).as_char(), 'G');
    /// assert_eq!(Tile::Wolf.as_char(), 'W');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Animal(animal) => animal.as_char(),
            Tile::Wolf => 'W',
            Tile::BlackSheep => 'B',
        }
    }

    /// Parses a tile from its ASCII art character.
    ///
    /// # Examples
    ///
    /// ```
    /// use herdfall_engine::{Animal, Tile};
    ///
    /// assert_eq!(Tile::from_char('P'), Some(Tile::Animal(Animal::Pig)));
    /// assert_eq!(Tile::from_char('B'), Some(Tile::BlackSheep));
    /// assert_eq!(Tile::from_char('x'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Tile::Empty),
            'S' => Some(Tile::Animal(Animal::Sheep)),
            'G' => Some(Tile::Animal(Animal::Goat)),
            'C' => Some(Tile::Animal(Animal::Chicken)),
            'M' => Some(Tile::Animal(Animal::Cow)),
            'P' => Some(Tile::Animal(Animal::Pig)),
            'W' => Some(Tile::Wolf),
            'B' => Some(Tile::BlackSheep),
            _ => None,
        }
    }
}

impl From<Animal> for Tile {
    fn from(animal: Animal) -> Self {
        Tile::Animal(animal)
    }
}

/// Terrain modifier stored parallel to the board.
///
/// Overlay marks never block movement and are never moved by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum OverlayMark {
    #[default]
    None,
    Egg,
    Turd,
}

impl OverlayMark {
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, OverlayMark::None)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            OverlayMark::None => "",
            OverlayMark::Egg => "🥚",
            OverlayMark::Turd => "💩",
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            OverlayMark::None => '.',
            OverlayMark::Egg => 'e',
            OverlayMark::Turd => 't',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(OverlayMark::None),
            'e' => Some(OverlayMark::Egg),
            't' => Some(OverlayMark::Turd),
            _ => None,
        }
    }
}
