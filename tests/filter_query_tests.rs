//! Filter form input to backend query parameters
use product_rec_agent_lib::domain::{FilterCriteria, SortKey};

#[test]
fn blank_form_sends_no_parameters() {
    let criteria = FilterCriteria::from_inputs("", "", "", "", "");
    assert!(criteria.is_unconstrained());
    assert!(criteria.to_query().is_empty());
    assert_eq!(criteria, FilterCriteria::cleared());
}

#[test]
fn whitespace_only_inputs_are_ignored() {
    let criteria = FilterCriteria::from_inputs("   ", " ", "", "  ", "");
    assert!(criteria.to_query().is_empty());
}

#[test]
fn full_form_keeps_parameter_order() {
    let criteria = FilterCriteria::from_inputs("lamp", "Home", "price_asc", "10", "50.5");
    let keys: Vec<&str> = criteria.to_query().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["search", "category", "sort_by", "min_price", "max_price"]);

    let query = criteria.to_query();
    assert_eq!(query.get("search"), Some("lamp"));
    assert_eq!(query.get("category"), Some("Home"));
    assert_eq!(query.get("sort_by"), Some("price_asc"));
    assert_eq!(query.get("min_price"), Some("10"));
    assert_eq!(query.get("max_price"), Some("50.5"));
}

#[test]
fn unparseable_prices_are_dropped() {
    let criteria = FilterCriteria::from_inputs("", "", "", "cheap", "-");
    assert_eq!(criteria.min_price, None);
    assert_eq!(criteria.max_price, None);
    assert!(criteria.to_query().get("min_price").is_none());
}

#[test]
fn unknown_sort_falls_back_to_default() {
    let criteria = FilterCriteria::from_inputs("", "", "most_popular", "", "");
    assert_eq!(criteria.sort, SortKey::default());
}

#[test]
fn open_ended_price_range_sends_one_bound() {
    let query = FilterCriteria::default()
        .with_price_range(Some(10.0), None)
        .to_query();
    assert_eq!(query.len(), 1);
    assert_eq!(query.get("min_price"), Some("10"));
}
