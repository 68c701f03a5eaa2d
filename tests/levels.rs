use proptest::prelude::*;
use sc6607_flashlight::levels::{
    LEVEL_NUM, LEVELS, MAX_TORCH_LEVEL, current_ma, entry, is_torch, verify_level,
};

#[test]
fn in_range_levels_are_unchanged() {
    for level in 0..LEVEL_NUM as i32 {
        assert_eq!(i32::from(verify_level(level)), level);
    }
}

#[test]
fn torch_range_ends_at_seven() {
    assert_eq!(MAX_TORCH_LEVEL, 7);
    for level in 0..LEVEL_NUM as u8 {
        assert_eq!(is_torch(level), level < 8);
    }
}

#[test]
fn current_table_edges() {
    assert_eq!(current_ma(0), 25);
    assert_eq!(current_ma(7), 200);
    assert_eq!(current_ma(8), 250);
    assert_eq!(current_ma(27), 1200);
    assert_eq!(current_ma(500), 1200);
    assert_eq!(current_ma(-3), 25);
}

#[test]
fn flash_code_for_level_ten() {
    assert_eq!(entry(10).flash, 0x1A);
    assert_eq!(entry(10), LEVELS[10]);
}

proptest! {
    #[test]
    fn negative_levels_clamp_to_zero(level in i32::MIN..0) {
        prop_assert_eq!(verify_level(level), 0);
    }

    #[test]
    fn large_levels_clamp_to_top(level in 28..i32::MAX) {
        prop_assert_eq!(verify_level(level), 27);
    }
}
