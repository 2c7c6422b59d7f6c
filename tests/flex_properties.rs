//! Property tests for flex placement.

use cellwright::layout::main_axis_spacing;
use cellwright::*;
use proptest::prelude::*;

fn main_alignment() -> impl Strategy<Value = MainAxisAlignment> {
    prop_oneof![
        Just(MainAxisAlignment::Start),
        Just(MainAxisAlignment::End),
        Just(MainAxisAlignment::Center),
        Just(MainAxisAlignment::SpaceBetween),
        Just(MainAxisAlignment::SpaceAround),
        Just(MainAxisAlignment::SpaceEvenly),
    ]
}

fn cross_alignment() -> impl Strategy<Value = CrossAxisAlignment> {
    prop_oneof![
        Just(CrossAxisAlignment::Start),
        Just(CrossAxisAlignment::End),
        Just(CrossAxisAlignment::Center),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_spacing_never_exceeds_remaining(
        remaining in 0u32..500,
        count in 0usize..12,
        alignment in main_alignment(),
    ) {
        let (lead, gap) = main_axis_spacing(alignment, remaining, count);
        let gaps = gap * count.saturating_sub(1) as u32;
        prop_assert!(
            lead + gaps <= remaining,
            "{:?} used {} of {} for {} children",
            alignment, lead + gaps, remaining, count
        );
    }

    #[test]
    fn prop_row_children_fit_in_order(
        widths in prop::collection::vec(0u32..6, 0..6),
        heights in prop::collection::vec(1u32..4, 6),
        extra in 0u32..20,
        height in 3u32..6,
        main in main_alignment(),
        cross in cross_alignment(),
    ) {
        let max_width = widths.iter().sum::<u32>() + extra;
        let row: Widget = Row::new(
            widths
                .iter()
                .zip(&heights)
                .map(|(&w, &h)| SizedBox::new(w, h).into()),
        )
        .main_axis(main)
        .cross_axis(cross)
        .into();

        let mut tree = ElementTree::new();
        let constraints = Size::new(max_width, height).loose();
        tree.reconcile(&row, constraints)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(constraints.is_satisfied_by(tree.root().size()));
        prop_assert_eq!(tree.root().size().width, Dimension::Cells(max_width));

        let flex = tree.root().child(0).expect("flex element");
        let final_height = tree.root().size().height.cells_or_max() as i32;
        let mut cursor = 0i32;
        for ((_, child), (&w, &h)) in flex.children().zip(widths.iter().zip(&heights)) {
            let pos = child.position();
            prop_assert!(pos.x >= cursor, "child at {} overlaps previous ending at {}", pos.x, cursor);
            prop_assert!(pos.y >= 0 && pos.y + h as i32 <= final_height);
            cursor = pos.x + w as i32;
        }
        prop_assert!(cursor <= max_width as i32);
    }

    #[test]
    fn prop_shrink_wrapped_column_is_sum_of_children(
        heights in prop::collection::vec(0u32..5, 0..8),
        min_height in 0u32..10,
    ) {
        let total: u32 = heights.iter().sum();
        let column: Widget = Column::new(heights.iter().map(|&h| SizedBox::new(1, h).into()))
            .shrink_wrap()
            .into();

        let mut tree = ElementTree::new();
        let constraints = Constraints::new(Size::new(0, min_height), Size::new(2, total + min_height));
        tree.reconcile(&column, constraints)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(tree.root().size().height, Dimension::Cells(total.max(min_height)));
    }
}
