/// Dense row-major 2D array indexed by `(x, y)` or by linear index.
///
/// The linear index of `(x, y)` is `y * width + x`. This is the only addressing scheme used for
/// parent links and frontier entries, so [`Grid::to_linear`] and [`Grid::from_linear`] are
/// bijective on in-bounds values.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    cells: Box<[T]>,
}

impl<T> Grid<T> {
    #[track_caller]
    pub fn new(width: i32, height: i32, mut f: impl FnMut(i32, i32) -> T) -> Self {
        let w: usize = width.try_into().expect("width must be non-negative");
        let h: usize = height.try_into().expect("height must be non-negative");
        let cells = (0..h)
            .flat_map(move |y| (0..w).map(move |x| (x as i32, y as i32)))
            .map(|(x, y)| f(x, y))
            .collect();
        Grid {
            width,
            height,
            cells,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells, `width * height`.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn storage(&self) -> &[T] {
        &self.cells
    }

    pub fn storage_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    #[inline(always)]
    pub fn contains(&self, (x, y): (i32, i32)) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Converts a coordinate to its linear index, or `None` if it is out of bounds.
    #[inline(always)]
    pub fn to_linear(&self, (x, y): (i32, i32)) -> Option<usize> {
        self.contains((x, y)).then(|| self.index(x, y))
    }

    /// Converts a linear index back to its coordinate, or `None` if it is out of bounds.
    #[inline(always)]
    pub fn from_linear(&self, index: usize) -> Option<(i32, i32)> {
        if index >= self.cells.len() {
            return None;
        }
        let w = self.width as usize;
        Some(((index % w) as i32, (index / w) as i32))
    }

    pub fn get(&self, state: (i32, i32)) -> Option<&T> {
        self.to_linear(state).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, state: (i32, i32)) -> Option<&mut T> {
        self.to_linear(state).map(|i| &mut self.cells[i])
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> usize {
        self.width as usize * y as usize + x as usize
    }

    #[track_caller]
    #[inline(always)]
    fn bounds_check(&self, x: i32, y: i32) {
        assert!(x >= 0, "x out of bounds");
        assert!(y >= 0, "y out of bounds");
        assert!(x < self.width, "x out of bounds");
        assert!(y < self.height, "y out of bounds");
    }
}

impl<T> std::ops::Index<(i32, i32)> for Grid<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, (x, y): (i32, i32)) -> &T {
        self.bounds_check(x, y);
        &self.cells[self.index(x, y)]
    }
}

impl<T> std::ops::IndexMut<(i32, i32)> for Grid<T> {
    #[track_caller]
    fn index_mut(&mut self, (x, y): (i32, i32)) -> &mut T {
        self.bounds_check(x, y);
        let i = self.index(x, y);
        &mut self.cells[i]
    }
}

impl<T> std::ops::Index<usize> for Grid<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        &self.cells[index]
    }
}

impl<T> std::ops::IndexMut<usize> for Grid<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.cells[index]
    }
}
