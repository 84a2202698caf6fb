use crate::error::LayoutError;
use crate::geometry::{Rect, Size};

use super::column::{Column, ItemId, PlacedItem};
use super::config::LayoutConfig;

/// Inputs for building one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRequest {
    pub index: usize,
    pub item_count: usize,
    /// `None` when the source declined to answer.
    pub column_count: Option<usize>,
    /// Top of the section frame, before the top inset.
    pub top_y: f64,
    pub container_width: f64,
}

/// A group of items sharing one column configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    index: usize,
    item_count: usize,
    top_y: f64,
    width: f64,
    bottom_inset: f64,
    columns: Vec<Column>,
    // item index -> (column, slot within column)
    locations: Vec<(usize, usize)>,
}

impl Section {
    /// Lay out every item of the section with the shortest-column policy.
    ///
    /// Clamped inputs and degenerate item sizes are pushed onto `issues`; the
    /// section is always fully built.
    pub fn build<F>(
        request: SectionRequest,
        config: &LayoutConfig,
        mut intrinsic_size: F,
        issues: &mut Vec<LayoutError>,
    ) -> Section
    where
        F: FnMut(ItemId) -> Option<Size>,
    {
        let column_count = resolve_column_count(request, config, issues);
        let item_count = resolve_item_count(request, config, issues);
        let insets = config.section_insets;
        let spacing = config.minimum_interitem_spacing;
        let available = request.container_width - insets.horizontal();
        let gaps = spacing * (column_count - 1) as f64;

        let mut column_width = (available - gaps) / column_count as f64;
        if !column_width.is_finite() || column_width < 0.0 {
            issues.push(LayoutError::invalid_input(
                request.index,
                format!("derived column width {column_width} clamped to 0"),
            ));
            column_width = 0.0;
        }

        let initial_y = request.top_y + insets.top;
        let mut columns: Vec<Column> = (0..column_count)
            .map(|idx| {
                let x_offset = insets.left + idx as f64 * (column_width + spacing);
                Column::new(
                    idx,
                    x_offset,
                    column_width,
                    config.minimum_line_spacing,
                    initial_y,
                )
            })
            .collect();

        let mut locations = Vec::with_capacity(item_count);
        for item in 0..item_count {
            let id = ItemId::new(request.index, item);
            let size = intrinsic_size(id).unwrap_or(config.default_item_size);
            let target = shortest_column_index(&columns);
            let column = &mut columns[target];

            if let Err(err) = column.append(id, size) {
                column.append_zero_height(id);
                issues.push(err);
            }
            locations.push((target, column.len() - 1));
        }

        Section {
            index: request.index,
            item_count,
            top_y: request.top_y,
            width: request.container_width.max(0.0),
            bottom_inset: insets.bottom,
            columns,
            locations,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Lowest point reached by any column.
    pub fn bottom_edge(&self) -> f64 {
        self.tallest_column().bottom_edge()
    }

    /// Bounding rect of the section, insets included.
    pub fn frame(&self) -> Rect {
        let bottom = self.bottom_edge() + self.bottom_inset;
        Rect::new(0.0, self.top_y, self.width, bottom - self.top_y)
    }

    /// Column with the smallest bottom edge; the lowest index wins ties.
    pub fn shortest_column(&self) -> &Column {
        &self.columns[shortest_column_index(&self.columns)]
    }

    /// Column with the largest bottom edge; the lowest index wins ties.
    pub fn tallest_column(&self) -> &Column {
        let mut tallest = 0;
        for (idx, column) in self.columns.iter().enumerate().skip(1) {
            if column.bottom_edge() > self.columns[tallest].bottom_edge() {
                tallest = idx;
            }
        }
        &self.columns[tallest]
    }

    /// Every placed item, column by column in insertion order.
    ///
    /// This is not item index order; see [`Section::items_in_index_order`].
    pub fn items(&self) -> Vec<PlacedItem> {
        self.iter_items().copied().collect()
    }

    pub fn items_in_index_order(&self) -> Vec<PlacedItem> {
        self.locations
            .iter()
            .map(|&(column, slot)| self.columns[column].items()[slot])
            .collect()
    }

    pub fn item_rect(&self, item: usize) -> Option<Rect> {
        let &(column, slot) = self.locations.get(item)?;
        self.columns
            .get(column)
            .and_then(|column| column.items().get(slot))
            .map(|placed| placed.rect)
    }

    pub fn items_intersecting<'a>(
        &'a self,
        query: &'a Rect,
    ) -> impl Iterator<Item = &'a PlacedItem> + 'a {
        self.iter_items()
            .filter(move |placed| placed.rect.intersects(query))
    }

    fn iter_items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.columns.iter().flat_map(|column| column.items().iter())
    }
}

fn resolve_column_count(
    request: SectionRequest,
    config: &LayoutConfig,
    issues: &mut Vec<LayoutError>,
) -> usize {
    let max = config.max_column_count.max(1);
    let fallback = config.default_column_count.clamp(1, max);
    match request.column_count {
        Some(0) => {
            issues.push(LayoutError::invalid_input(
                request.index,
                format!("column count 0 clamped to {fallback}"),
            ));
            fallback
        }
        Some(count) if count > max => {
            issues.push(LayoutError::invalid_input(
                request.index,
                format!("column count {count} clamped to {max}"),
            ));
            max
        }
        Some(count) => count,
        None => fallback,
    }
}

fn resolve_item_count(
    request: SectionRequest,
    config: &LayoutConfig,
    issues: &mut Vec<LayoutError>,
) -> usize {
    let max = config.max_items_per_section;
    if request.item_count > max {
        issues.push(LayoutError::invalid_input(
            request.index,
            format!("item count {} clamped to {max}", request.item_count),
        ));
        return max;
    }
    request.item_count
}

fn shortest_column_index(columns: &[Column]) -> usize {
    let mut shortest = 0;
    for (idx, column) in columns.iter().enumerate().skip(1) {
        if column.bottom_edge() < columns[shortest].bottom_edge() {
            shortest = idx;
        }
    }
    shortest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EdgeInsets;
    use crate::layout::config::DEFAULT_MAX_COLUMN_COUNT;

    fn request(item_count: usize, column_count: Option<usize>, width: f64) -> SectionRequest {
        SectionRequest {
            index: 0,
            item_count,
            column_count,
            top_y: 0.0,
            container_width: width,
        }
    }

    fn build_with(
        request: SectionRequest,
        config: &LayoutConfig,
        sizes: &[Size],
    ) -> (Section, Vec<LayoutError>) {
        let mut issues = Vec::new();
        let section = Section::build(
            request,
            config,
            |id| sizes.get(id.item).copied(),
            &mut issues,
        );
        (section, issues)
    }

    #[test]
    fn square_items_alternate_between_two_columns() {
        let sizes = [Size::new(100.0, 100.0); 4];
        let (section, issues) =
            build_with(request(4, Some(2), 200.0), &LayoutConfig::default(), &sizes);

        assert!(issues.is_empty());
        assert_eq!(section.item_rect(0), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(section.item_rect(1), Some(Rect::new(100.0, 0.0, 100.0, 100.0)));
        assert_eq!(section.item_rect(2), Some(Rect::new(0.0, 100.0, 100.0, 100.0)));
        assert_eq!(section.item_rect(3), Some(Rect::new(100.0, 100.0, 100.0, 100.0)));
        assert_eq!(section.bottom_edge(), 200.0);
    }

    #[test]
    fn single_column_stacks_sequentially() {
        let sizes = [
            Size::new(100.0, 50.0),
            Size::new(100.0, 30.0),
            Size::new(100.0, 70.0),
        ];
        let (section, _) = build_with(request(3, Some(1), 100.0), &LayoutConfig::default(), &sizes);

        let tops: Vec<f64> = section.items().iter().map(|placed| placed.rect.y).collect();
        assert_eq!(tops, vec![0.0, 50.0, 80.0]);
        assert_eq!(section.bottom_edge(), 150.0);
    }

    #[test]
    fn ties_go_to_the_lowest_column_index() {
        let sizes = [Size::new(1.0, 1.0); 3];
        let (section, _) = build_with(request(3, Some(3), 300.0), &LayoutConfig::default(), &sizes);
        let columns: Vec<usize> = section
            .columns()
            .iter()
            .map(|column| column.items()[0].id.item)
            .collect();
        assert_eq!(columns, vec![0, 1, 2]);

        // Column 1 ends shorter, so the fourth item goes there even though
        // column 0 has the lower index.
        let sizes = [
            Size::new(1.0, 2.0),
            Size::new(1.0, 1.0),
            Size::new(1.0, 2.0),
            Size::new(1.0, 1.0),
            Size::new(1.0, 1.0),
        ];
        let (section, _) = build_with(request(5, Some(3), 300.0), &LayoutConfig::default(), &sizes);
        assert_eq!(section.item_rect(3).unwrap().x, 100.0);
        // Columns 0, 1 and 2 now end at 200; the tie goes back to column 0.
        assert_eq!(section.item_rect(4).unwrap().x, 0.0);
    }

    #[test]
    fn items_are_flattened_by_column_not_by_index() {
        let sizes = [Size::new(100.0, 100.0); 4];
        let (section, _) = build_with(request(4, Some(2), 200.0), &LayoutConfig::default(), &sizes);

        let by_column: Vec<usize> = section.items().iter().map(|p| p.id.item).collect();
        let by_index: Vec<usize> = section
            .items_in_index_order()
            .iter()
            .map(|p| p.id.item)
            .collect();
        assert_eq!(by_column, vec![0, 2, 1, 3]);
        assert_eq!(by_index, vec![0, 1, 2, 3]);
    }

    #[test]
    fn every_item_is_placed_exactly_once() {
        let sizes: Vec<Size> = (0..37)
            .map(|i| Size::new(100.0, 40.0 + (i * 17 % 90) as f64))
            .collect();
        for columns in 1..=6 {
            let (section, _) = build_with(
                request(sizes.len(), Some(columns), 600.0),
                &LayoutConfig::default(),
                &sizes,
            );
            let mut seen: Vec<usize> = section.items().iter().map(|p| p.id.item).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..sizes.len()).collect::<Vec<_>>());

            let placed: usize = section.columns().iter().map(Column::len).sum();
            assert_eq!(placed, section.item_count());

            let max_column = section
                .columns()
                .iter()
                .map(Column::bottom_edge)
                .fold(f64::MIN, f64::max);
            assert_eq!(section.bottom_edge(), max_column);
        }
    }

    #[test]
    fn missing_sizes_fall_back_to_default() {
        let (section, _) = build_with(request(1, None, 300.0), &LayoutConfig::default(), &[]);
        // 600x800 scaled to width 300.
        assert_eq!(section.item_rect(0), Some(Rect::new(0.0, 0.0, 300.0, 400.0)));
        assert_eq!(section.columns().len(), 1);
    }

    #[test]
    fn zero_columns_clamp_to_default_and_are_reported() {
        let config = LayoutConfig::default().with_default_column_count(2);
        let (section, issues) = build_with(request(2, Some(0), 200.0), &config, &[]);

        assert_eq!(section.columns().len(), 2);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], LayoutError::InvalidInput { section: 0, .. }));
    }

    #[test]
    fn oversized_column_count_clamps_to_the_cap() {
        let (section, issues) = build_with(
            request(2, Some(usize::MAX), 200.0),
            &LayoutConfig::default(),
            &[],
        );

        assert_eq!(section.columns().len(), DEFAULT_MAX_COLUMN_COUNT);
        assert_eq!(section.items().len(), 2);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], LayoutError::InvalidInput { section: 0, .. }));

        let config = LayoutConfig::default().with_max_column_count(3);
        let (section, issues) = build_with(request(1, Some(8), 300.0), &config, &[]);
        assert_eq!(section.columns().len(), 3);
        assert_eq!(section.columns()[0].width(), 100.0);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn oversized_item_count_clamps_to_the_cap() {
        let config = LayoutConfig::default().with_max_items_per_section(3);
        let sizes = [Size::new(1.0, 1.0); 3];
        let (section, issues) = build_with(request(usize::MAX, Some(1), 10.0), &config, &sizes);

        assert_eq!(section.item_count(), 3);
        assert_eq!(section.items().len(), 3);
        assert_eq!(section.item_rect(3), None);
        assert!(matches!(issues[0], LayoutError::InvalidInput { section: 0, .. }));
    }

    #[test]
    fn degenerate_item_becomes_zero_height() {
        let sizes = [
            Size::new(100.0, 100.0),
            Size::new(0.0, 100.0),
            Size::new(100.0, 100.0),
        ];
        let (section, issues) = build_with(request(3, Some(1), 100.0), &LayoutConfig::default(), &sizes);

        assert_eq!(section.item_rect(1), Some(Rect::new(0.0, 100.0, 100.0, 0.0)));
        assert_eq!(section.item_rect(2), Some(Rect::new(0.0, 100.0, 100.0, 100.0)));
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0],
            LayoutError::DegenerateGeometry { item, .. } if item == ItemId::new(0, 1)
        ));
    }

    #[test]
    fn spacing_and_insets_shape_the_grid() {
        let config = LayoutConfig::default()
            .with_interitem_spacing(10.0)
            .with_line_spacing(5.0)
            .with_section_insets(EdgeInsets::new(20.0, 15.0, 30.0, 15.0));
        let sizes = [Size::new(1.0, 1.0); 3];
        let mut req = request(3, Some(2), 240.0);
        req.top_y = 100.0;
        let (section, issues) = build_with(req, &config, &sizes);

        assert!(issues.is_empty());
        // (240 - 30 - 10) / 2 = 100
        assert_eq!(section.item_rect(0), Some(Rect::new(15.0, 120.0, 100.0, 100.0)));
        assert_eq!(section.item_rect(1), Some(Rect::new(125.0, 120.0, 100.0, 100.0)));
        assert_eq!(section.item_rect(2), Some(Rect::new(15.0, 225.0, 100.0, 100.0)));
        assert_eq!(section.bottom_edge(), 325.0);
        assert_eq!(section.frame(), Rect::new(0.0, 100.0, 240.0, 255.0));
    }

    #[test]
    fn empty_section_spans_only_its_insets() {
        let config =
            LayoutConfig::default().with_section_insets(EdgeInsets::new(8.0, 0.0, 12.0, 0.0));
        let (section, _) = build_with(request(0, Some(3), 90.0), &config, &[]);

        assert_eq!(section.bottom_edge(), 8.0);
        assert_eq!(section.frame().height, 20.0);
        assert!(section.items().is_empty());
        assert_eq!(section.item_rect(0), None);
    }

    #[test]
    fn oversized_gaps_clamp_column_width() {
        let config = LayoutConfig::default().with_interitem_spacing(500.0);
        let (section, issues) = build_with(request(1, Some(3), 100.0), &config, &[]);

        assert_eq!(section.columns()[0].width(), 0.0);
        assert_eq!(section.item_rect(0).unwrap().height, 0.0);
        assert!(matches!(issues[0], LayoutError::InvalidInput { .. }));
    }
}
