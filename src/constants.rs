/// Currency against which all exchange rates are stored. Any other pair is
/// derived through this pivot, so the store never holds O(n^2) combinations.
pub const PIVOT_CURRENCY: &str = "EUR";

/// Scale used for persisted monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Date format used for all persisted dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
