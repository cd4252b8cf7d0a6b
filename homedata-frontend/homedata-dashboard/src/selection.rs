use homedata_api_types::{Bedroom, DataType, SeasonalMode, Selection};

/// Anything that can report the filters the user has picked.
pub trait SelectionSource {
    fn read_selections(&self) -> Selection;
}

impl SelectionSource for Selection {
    fn read_selections(&self) -> Selection {
        self.clone()
    }
}

/// Neighborhoods whose name contains `query`, ignoring case, in input order.
pub fn filter_neighborhoods<'a, S: AsRef<str>>(all: &'a [S], query: &str) -> Vec<&'a str> {
    let query = query.to_lowercase();
    all.iter()
        .map(AsRef::as_ref)
        .filter(|name| name.to_lowercase().contains(&query))
        .collect()
}

fn set_member<T: PartialEq>(values: &mut Vec<T>, value: T, checked: bool) {
    if checked {
        if !values.contains(&value) {
            values.push(value);
        }
    } else {
        values.retain(|v| v != &value);
    }
}

/// State of the filter controls: the checked boxes plus the neighborhood
/// search box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPanel {
    selection: Selection,
    neighborhood_query: String,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn toggle_data_type(&mut self, data_type: DataType, checked: bool) {
        set_member(&mut self.selection.data_types, data_type, checked);
    }

    pub fn toggle_bedroom(&mut self, bedroom: Bedroom, checked: bool) {
        set_member(&mut self.selection.bedrooms, bedroom, checked);
    }

    pub fn toggle_neighborhood(&mut self, neighborhood: &str, checked: bool) {
        set_member(
            &mut self.selection.neighborhoods,
            neighborhood.to_string(),
            checked,
        );
    }

    pub fn set_seasonal_checkbox(&mut self, toggled: SeasonalMode, checked: bool) {
        self.selection.seasonal_mode = self
            .selection
            .seasonal_mode
            .after_checkbox_change(toggled, checked);
    }

    pub fn set_secondary_axis(&mut self, enabled: bool) {
        self.selection.use_secondary_axis = enabled;
    }

    pub fn set_neighborhood_query(&mut self, query: impl Into<String>) {
        self.neighborhood_query = query.into();
    }

    pub fn visible_neighborhoods<'a, S: AsRef<str>>(&self, all: &'a [S]) -> Vec<&'a str> {
        filter_neighborhoods(all, &self.neighborhood_query)
    }

    /// Back to the initial filters. The search box is cleared too.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl SelectionSource for FilterPanel {
    fn read_selections(&self) -> Selection {
        self.selection.clone()
    }
}
