use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

type Grid = [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT];
const EMPTY_SCREEN: Grid = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// The 64x32 monochrome display.
/// Coordinates wrap on both axes, so anything drawn past
/// an edge comes back in on the opposite side.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    cells: Grid,
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer {
            cells: EMPTY_SCREEN,
        }
    }

    fn cell(&mut self, x: usize, y: usize) -> &mut bool {
        &mut self.cells[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        *self.cell(x, y) = value;
    }

    pub fn toggle(&mut self, x: usize, y: usize) {
        let cell = self.cell(x, y);
        *cell = !*cell;
    }

    pub fn clear(&mut self) {
        self.cells = EMPTY_SCREEN;
    }

    pub fn is_clear(&self) -> bool {
        self.cells.iter().flatten().all(|pixel| !pixel)
    }

    /// XOR a sprite onto the screen, one byte per row with the most
    /// significant bit leftmost. Returns whether any of the eight cells
    /// covered by a row was already on, whatever the sprite bit there.
    pub fn draw_sprite<R>(&mut self, x: usize, y: usize, rows: R) -> bool
    where
        R: IntoIterator<Item = u8>,
    {
        let mut collided = false;
        for (dy, row) in rows.into_iter().enumerate() {
            for dx in 0..8 {
                let cell = self.cell(x + dx, y + dy);
                collided |= *cell;
                *cell ^= row >> (7 - dx) & 1 == 1;
            }
        }
        collided
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool; SCREEN_WIDTH]> {
        self.cells.iter()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for pixel in row.iter() {
                write!(f, "{}", if *pixel { "#" } else { " " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Framebuffer")?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn toggle_flips_a_pixel() {
        let mut screen = Framebuffer::new();
        screen.toggle(3, 4);
        assert!(screen.get(3, 4));
        screen.toggle(3, 4);
        assert!(!screen.get(3, 4));
    }

    #[test]
    fn coordinates_wrap() {
        let mut screen = Framebuffer::new();
        screen.set(SCREEN_WIDTH + 1, SCREEN_HEIGHT * 2 + 2, true);
        assert!(screen.get(1, 2));
    }

    #[test]
    fn clear_clears_everything() {
        let mut screen = Framebuffer::new();
        for n in 0..SCREEN_WIDTH {
            screen.set(n, n, true);
        }
        assert!(!screen.is_clear());
        screen.clear();
        assert!(screen.is_clear());
    }

    #[test]
    fn msb_is_leftmost() {
        let mut screen = Framebuffer::new();
        screen.draw_sprite(10, 0, vec![0b1000_0001]);
        assert!(screen.get(10, 0));
        assert!(!screen.get(11, 0));
        assert!(screen.get(17, 0));
        assert!(!screen.get(18, 0));
    }

    #[test_case(62, 5, &[0xF0], &[(62, 5), (63, 5), (0, 5), (1, 5)] ; "right edge")]
    #[test_case(10, 31, &[0x80, 0x80], &[(10, 31), (10, 0)] ; "bottom edge")]
    #[test_case(63, 31, &[0xC0, 0xC0], &[(63, 31), (0, 31), (63, 0), (0, 0)] ; "corner")]
    fn sprites_wrap_around_edges(x: usize, y: usize, sprite: &[u8], expected: &[(usize, usize)]) {
        let mut screen = Framebuffer::new();
        screen.draw_sprite(x, y, sprite.iter().copied());
        for &(px, py) in expected {
            assert!(screen.get(px, py), "pixel ({}, {}) should be set", px, py);
        }
        let set = screen.rows().flatten().filter(|pixel| **pixel).count();
        assert_eq!(expected.len(), set);
    }

    #[test]
    fn drawing_on_clear_screen_does_not_collide() {
        let mut screen = Framebuffer::new();
        assert_eq!(false, screen.draw_sprite(0, 0, vec![0xFF; 15]));
    }

    #[test]
    fn drawing_over_a_set_pixel_collides() {
        let mut screen = Framebuffer::new();
        screen.set(7, 2, true);
        assert_eq!(true, screen.draw_sprite(0, 0, vec![0x00, 0x00, 0x01]));
        assert!(!screen.get(7, 2));
    }

    #[test]
    fn collision_ignores_pixels_outside_the_sprite_box() {
        let mut screen = Framebuffer::new();
        screen.set(8, 0, true);
        assert_eq!(false, screen.draw_sprite(0, 0, vec![0xFF]));
        assert!(screen.get(8, 0));
    }

    #[test]
    fn collision_counts_every_covered_cell() {
        let mut screen = Framebuffer::new();
        screen.set(3, 0, true);
        assert_eq!(true, screen.draw_sprite(0, 0, vec![0b1000_0000]));
        assert!(screen.get(0, 0));
        assert!(screen.get(3, 0));
    }

    #[test]
    fn clear_sprite_bits_leave_pixels_alone() {
        let mut screen = Framebuffer::new();
        screen.set(1, 0, true);
        assert_eq!(true, screen.draw_sprite(0, 0, vec![0b1000_0000]));
        assert!(screen.get(0, 0));
        assert!(screen.get(1, 0));
    }

    #[test]
    fn display_renders_hashes() {
        let mut screen = Framebuffer::new();
        screen.set(0, 0, true);
        let text = screen.to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(SCREEN_WIDTH, first.len());
        assert!(first.starts_with("# "));
        assert_eq!(SCREEN_HEIGHT, text.lines().count());
    }

    proptest! {
        #[test]
        fn drawing_twice_restores_the_screen(
            x in 0usize..SCREEN_WIDTH,
            y in 0usize..SCREEN_HEIGHT,
            sprite in proptest::collection::vec(any::<u8>(), 0..16),
            noise in proptest::collection::vec((0usize..SCREEN_WIDTH, 0usize..SCREEN_HEIGHT), 0..64),
        ) {
            let mut screen = Framebuffer::new();
            for (nx, ny) in noise {
                screen.set(nx, ny, true);
            }
            let before = screen.clone();
            screen.draw_sprite(x, y, sprite.clone());
            screen.draw_sprite(x, y, sprite);
            prop_assert_eq!(before, screen);
        }

        #[test]
        fn nonempty_sprite_over_set_pixels_collides(
            x in 0usize..SCREEN_WIDTH,
            y in 0usize..SCREEN_HEIGHT,
            sprite in proptest::collection::vec(any::<u8>(), 1..16),
        ) {
            prop_assume!(sprite.iter().any(|row| *row != 0));
            let mut screen = Framebuffer::new();
            prop_assert!(!screen.draw_sprite(x, y, sprite.clone()));
            prop_assert!(screen.draw_sprite(x, y, sprite));
        }
    }
}
