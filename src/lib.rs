// src/lib.rs
//
// Minimal two-player chess rules engine: board storage, per-piece
// pseudo-legal move generation, check detection, and a legality filter that
// refuses any move leaving the mover's own king in check. Deliberately
// omitted: castling, en passant, draw and checkmate detection, move history.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

// --- Constants ---

// (file delta, rank delta) pairs. Rank 0 is the top of the rendered board
// (Black's back rank), so White pawns advance toward decreasing ranks.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (-1, 2), (-2, 1),
    (1, -2), (2, -1), (-1, -2), (-2, -1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];
const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const INITIAL_GLYPHS: [&str; 8] = [
    "rnbqkbnr",
    "pppppppp",
    "........",
    "........",
    "........",
    "........",
    "PPPPPPPP",
    "RNBQKBNR",
];

// --- Enums and Basic Structs ---

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceType { Pawn, Knight, Bishop, Rook, Queen, King }

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceType, color: Color) -> Self { Piece { kind, color } }

    /// Parses a FEN glyph (uppercase = White, lowercase = Black).
    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_uppercase() { Color::White } else { Color::Black };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn, 'n' => PieceType::Knight, 'b' => PieceType::Bishop,
            'r' => PieceType::Rook, 'q' => PieceType::Queen, 'k' => PieceType::King,
            _ => return None,
        };
        Some(Piece::new(kind, color))
    }

    /// The FEN glyph for this piece.
    pub fn glyph(&self) -> char {
        let symbol = match self.kind {
            PieceType::Pawn => 'p', PieceType::Knight => 'n', PieceType::Bishop => 'b',
            PieceType::Rook => 'r', PieceType::Queen => 'q', PieceType::King => 'k',
        };
        match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// A board coordinate. `file` counts 0-7 from the a-file; `rank` counts 0-7
/// from the top of the rendered board, so rank 0 is Black's back rank and
/// rank 7 is White's.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Panics if either coordinate is outside [0,8). An out-of-range square
    /// is a caller defect, never user input.
    pub fn new(file: u8, rank: u8) -> Square {
        assert!(file < 8 && rank < 8, "square ({}, {}) out of range", file, rank);
        Square { file, rank }
    }

    pub fn file(&self) -> u8 { self.file }
    pub fn rank(&self) -> u8 { self.rank }

    /// The square displaced by (df, dr), or None when it leaves the board.
    fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square { file: file as u8, rank: rank as u8 })
        } else {
            None
        }
    }

    /// All 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, 8 - self.rank)
    }
}

// --- Move Representation ---

/// An ordered from/to pair. Carries no validity of its own; whether it is
/// playable depends entirely on the board and the side to move.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self { Move { from, to } }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

// --- Board Model ---

/// The 8x8 grid, indexed [rank][file]. A plain value type: `Clone` is the
/// deep copy used when a candidate move is applied speculatively, and the
/// copy never aliases the original.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// The standard starting position.
    pub fn initial() -> Board {
        Board::from_glyphs(INITIAL_GLYPHS)
    }

    /// Builds a board from eight rows of FEN glyphs, top rank first, '.' for
    /// an empty square. Panics on a malformed row; this constructor exists
    /// for fixed positions, not for user input.
    pub fn from_glyphs(rows: [&str; 8]) -> Board {
        let mut grid = [[None; 8]; 8];
        for (rank, row) in rows.iter().enumerate() {
            assert!(row.len() == 8, "glyph row '{}' is not 8 squares", row);
            for (file, c) in row.chars().enumerate() {
                grid[rank][file] = match c {
                    '.' => None,
                    _ => Some(Piece::from_char(c)
                        .unwrap_or_else(|| panic!("invalid piece glyph '{}'", c))),
                };
            }
        }
        Board { grid }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square.rank as usize][square.file as usize]
    }

    /// Applies a move to a copy of the board: the destination takes the
    /// moved piece (overwriting any occupant) and the source empties. A pawn
    /// arriving at either back rank is replaced by a queen of its own color;
    /// promotion is always to a queen, no other choice is offered.
    pub fn with_move(&self, mv: Move) -> Board {
        let mut next = self.clone();
        let moved = next.grid[mv.from.rank as usize][mv.from.file as usize].take();
        next.grid[mv.to.rank as usize][mv.to.file as usize] = moved;
        if let Some(piece) = moved {
            if piece.kind == PieceType::Pawn && (mv.to.rank == 0 || mv.to.rank == 7) {
                next.grid[mv.to.rank as usize][mv.to.file as usize] =
                    Some(Piece::new(PieceType::Queen, piece.color));
            }
        }
        next
    }

    /// Row-major grid of FEN glyphs, '.' for empty squares.
    pub fn render(&self) -> [[char; 8]; 8] {
        let mut out = [['.'; 8]; 8];
        for square in Square::all() {
            if let Some(piece) = self.piece_at(square) {
                out[square.rank as usize][square.file as usize] = piece.glyph();
            }
        }
        out
    }
}

// --- Move Generation ---

impl Board {
    /// Pseudo-legal destinations for the piece on `from`: movement geometry
    /// and occupancy only, with no regard for whether the mover's king ends
    /// up in check. An empty square generates nothing. The result is an
    /// unordered set; callers only test membership.
    pub fn pseudo_legal_moves(&self, from: Square) -> Vec<Square> {
        let piece = match self.piece_at(from) {
            Some(piece) => piece,
            None => return Vec::new(),
        };
        let mut dests = Vec::new();
        match piece.kind {
            PieceType::Pawn => self.pawn_moves(from, piece.color, &mut dests),
            PieceType::Knight => self.leaper_moves(from, piece.color, &KNIGHT_OFFSETS, &mut dests),
            PieceType::Bishop => self.slider_moves(from, piece.color, &DIAGONAL_DIRECTIONS, &mut dests),
            PieceType::Rook => self.slider_moves(from, piece.color, &ORTHOGONAL_DIRECTIONS, &mut dests),
            PieceType::Queen => {
                self.slider_moves(from, piece.color, &DIAGONAL_DIRECTIONS, &mut dests);
                self.slider_moves(from, piece.color, &ORTHOGONAL_DIRECTIONS, &mut dests);
            }
            PieceType::King => self.leaper_moves(from, piece.color, &KING_OFFSETS, &mut dests),
        }
        dests
    }

    fn pawn_moves(&self, from: Square, color: Color, dests: &mut Vec<Square>) {
        let (dir, start_rank) = match color {
            Color::White => (-1, 6),
            Color::Black => (1, 1),
        };
        // Forward pushes never capture. The double step exists only from the
        // pawn's starting rank, and only when both squares ahead are empty.
        if let Some(one) = from.offset(0, dir) {
            if self.piece_at(one).is_none() {
                dests.push(one);
                if from.rank == start_rank {
                    if let Some(two) = from.offset(0, 2 * dir) {
                        if self.piece_at(two).is_none() {
                            dests.push(two);
                        }
                    }
                }
            }
        }
        // Diagonal steps only onto enemy occupants (no en passant).
        for df in [-1, 1] {
            if let Some(diag) = from.offset(df, dir) {
                if self.piece_at(diag).map_or(false, |p| p.color != color) {
                    dests.push(diag);
                }
            }
        }
    }

    fn leaper_moves(&self, from: Square, color: Color, offsets: &[(i8, i8)], dests: &mut Vec<Square>) {
        for &(df, dr) in offsets {
            if let Some(to) = from.offset(df, dr) {
                if self.piece_at(to).map_or(true, |p| p.color != color) {
                    dests.push(to);
                }
            }
        }
    }

    fn slider_moves(&self, from: Square, color: Color, directions: &[(i8, i8)], dests: &mut Vec<Square>) {
        for &(df, dr) in directions {
            let mut current = from;
            while let Some(to) = current.offset(df, dr) {
                match self.piece_at(to) {
                    None => dests.push(to),
                    Some(p) if p.color != color => {
                        // Capture ends the ray.
                        dests.push(to);
                        break;
                    }
                    Some(_) => break, // friendly blocker, excluded
                }
                current = to;
            }
        }
    }
}

// --- Check Detection ---

impl Board {
    fn find_king(&self, side: Color) -> Option<Square> {
        Square::all().find(|&sq| self.piece_at(sq) == Some(Piece::new(PieceType::King, side)))
    }

    /// Whether `side`'s king square is attacked by any enemy piece. A board
    /// with no king of that color reports no check; constructed kingless
    /// positions get the permissive answer rather than a panic.
    pub fn is_in_check(&self, side: Color) -> bool {
        let king_sq = match self.find_king(side) {
            Some(sq) => sq,
            None => return false,
        };
        for sq in Square::all() {
            match self.piece_at(sq) {
                Some(piece) if piece.color != side => {
                    if self.pseudo_legal_moves(sq).contains(&king_sq) {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }
}

// --- Game State / Turn Controller ---

/// The one mutable value in the engine: the live board plus the side to
/// move. `attempt_move` either commits a legal move and flips the turn, or
/// rejects and leaves the state untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
}

impl GameState {
    /// A fresh game: standard starting position, White to move.
    pub fn new() -> GameState {
        GameState { board: Board::initial(), side_to_move: Color::White }
    }

    /// An arbitrary position, for puzzles and tests.
    pub fn with_position(board: Board, side_to_move: Color) -> GameState {
        GameState { board, side_to_move }
    }

    pub fn board(&self) -> &Board { &self.board }
    pub fn side_to_move(&self) -> Color { self.side_to_move }

    /// Parses and attempts one move for the side to move.
    ///
    /// The pipeline: decode the coordinates, confirm the source square holds
    /// the mover's own piece, confirm the destination is among the piece's
    /// pseudo-legal moves, then apply the move to a cloned board and reject
    /// if the mover's king would stand in check. Only a fully legal move
    /// mutates the state: the clone becomes the live board and the turn
    /// flips. Every rejection returns with the previous state intact.
    pub fn attempt_move(&mut self, input: &str) -> Result<(), MoveError> {
        let mv = parse_move(input)?;
        match self.board.piece_at(mv.from) {
            Some(piece) if piece.color == self.side_to_move => {}
            _ => return Err(MoveError::NoPieceOrWrongColor(mv.from)),
        }
        if !self.board.pseudo_legal_moves(mv.from).contains(&mv.to) {
            return Err(MoveError::IllegalDestination(mv));
        }
        let simulated = self.board.with_move(mv);
        if simulated.is_in_check(self.side_to_move) {
            return Err(MoveError::LeavesKingInCheck(mv));
        }
        self.board = simulated;
        self.side_to_move = self.side_to_move.opponent();
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self { GameState::new() }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for (rank, row) in self.board.render().iter().enumerate() {
            write!(f, "{}", 8 - rank)?;
            for c in row {
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "{:?} to move", self.side_to_move)
    }
}

// --- Notation Parsing ---

lazy_static! {
    // Exactly four significant characters: file, rank, file, rank.
    static ref MOVE_RE: Regex = Regex::new("^[a-h][1-8][a-h][1-8]$").unwrap();
}

/// Parses coordinate notation such as "e2e4" into a `Move`. Whitespace
/// (interior included) is stripped and casing normalized before matching;
/// anything that is not exactly file-rank-file-rank afterwards is rejected
/// whole, never as a partial move.
pub fn parse_move(input: &str) -> Result<Move, MoveError> {
    let normalized: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if !MOVE_RE.is_match(&normalized) {
        return Err(MoveError::InvalidFormat(input.trim().to_string()));
    }
    let bytes = normalized.as_bytes();
    let from = Square::new(bytes[0] - b'a', 8 - (bytes[1] - b'0'));
    let to = Square::new(bytes[2] - b'a', 8 - (bytes[3] - b'0'));
    Ok(Move::new(from, to))
}

// --- Custom Error Types ---

/// Why a proposed move was rejected. All four variants are recoverable and
/// user-facing: the caller reports the reason and prompts again, and the
/// game state is exactly what it was before the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    InvalidFormat(String),
    NoPieceOrWrongColor(Square),
    IllegalDestination(Move),
    LeavesKingInCheck(Move),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::InvalidFormat(input) => write!(f, "Invalid move format: '{}'. Use coordinates like 'e2e4'.", input),
            MoveError::NoPieceOrWrongColor(sq) => write!(f, "No piece of yours at {}.", sq),
            MoveError::IllegalDestination(mv) => write!(f, "Illegal move: '{}'.", mv),
            MoveError::LeavesKingInCheck(mv) => write!(f, "Illegal move '{}': leaves your king in check.", mv),
        }
    }
}

impl Error for MoveError {}

// --- Tests ---
