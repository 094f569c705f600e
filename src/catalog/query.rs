use super::product::Product;

/// Sort keys accepted by the catalog list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Input order preserved; the default when no sort is requested.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Newest,
    Oldest,
    MostViewed,
}

impl SortKey {
    /// Parse a query-string value. Unknown or absent values degrade to
    /// relevance rather than rejecting the request; the storefront has
    /// historically sent free-form sort names.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.unwrap_or_default() {
            "price-asc" | "price-low" => SortKey::PriceAsc,
            "price-desc" | "price-high" => SortKey::PriceDesc,
            "newest" => SortKey::Newest,
            "oldest" => SortKey::Oldest,
            "most-viewed" => SortKey::MostViewed,
            _ => SortKey::Relevance,
        }
    }
}

/// A catalog query: optional search text, category/sub-category membership
/// sets, and a sort key. `apply` is the single shared filtering/sorting
/// function used by every read path.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Pure pipeline over a product snapshot: search filter, category
    /// filter, sub-category filter, then a stable sort. The input is never
    /// mutated and an empty result is valid.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut out: Vec<Product> = products.iter().filter(|p| self.matches(p)).cloned().collect();

        match self.sort {
            SortKey::Relevance => {}
            SortKey::PriceAsc => out.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortKey::PriceDesc => out.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortKey::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortKey::MostViewed => out.sort_by(|a, b| b.views.cmp(&a.views)),
        }

        out
    }

    /// Predicate conjunction. The individual filters are independent, so
    /// their order does not affect the result set.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product) && self.matches_category(product) && self.matches_sub_category(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        let needle = match self.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return true,
        };
        product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
            || product.category.to_lowercase().contains(&needle)
    }

    fn matches_category(&self, product: &Product) -> bool {
        // exact-string membership, not prefix or fuzzy
        self.categories.is_empty() || self.categories.iter().any(|c| c == &product.category)
    }

    fn matches_sub_category(&self, product: &Product) -> bool {
        if self.sub_categories.is_empty() {
            return true;
        }
        match product.sub_category.as_deref() {
            Some(sub) => self.sub_categories.iter().any(|c| c == sub),
            None => false,
        }
    }
}

/// Split a comma-separated query parameter into a membership set.
pub fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::{ProductDraft, StockStatus};
    use chrono::{Duration, Utc};

    fn product(name: &str, category: &str, sub: Option<&str>, price: f64, views: i64, age_days: i64) -> Product {
        let now = Utc::now();
        let draft = ProductDraft {
            name: name.to_string(),
            description: format!("{} description", name),
            price,
            category: category.to_string(),
            sub_category: sub.map(str::to_string),
            stock: StockStatus::InStock,
            quantity: 1,
            contact_number: "555-0100".to_string(),
        };
        let mut p = Product::create(draft, vec!["/uploads/x.jpg".to_string()], now);
        p.views = views;
        p.created_at = now - Duration::days(age_days);
        p
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let query = CatalogQuery {
            search: Some("anything".to_string()),
            categories: vec!["Shoes".to_string()],
            sort: SortKey::PriceAsc,
            ..Default::default()
        };
        assert!(query.apply(&[]).is_empty());
    }

    #[test]
    fn search_matches_name_description_or_category() {
        let products = vec![
            product("Red Shoe A", "Shoes", None, 50.0, 0, 0),
            product("Blue Shoe B", "Shoes", None, 40.0, 0, 0),
            product("Desk Lamp", "A red light for desks", None, 20.0, 0, 0),
        ];

        let query = CatalogQuery {
            search: Some("red shoe".to_string()),
            ..Default::default()
        };
        let result = query.apply(&products);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Red Shoe A");

        // case-insensitive, and category text counts as a match target
        let query = CatalogQuery {
            search: Some("SHOES".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(&products).len(), 2);
    }

    #[test]
    fn search_miss_overrides_matching_category_filter() {
        let products = vec![product("Red Shoe A", "Shoes", None, 50.0, 0, 0)];
        let query = CatalogQuery {
            search: Some("no such thing".to_string()),
            categories: vec!["Shoes".to_string()],
            ..Default::default()
        };
        assert!(query.apply(&products).is_empty());
    }

    #[test]
    fn category_membership_is_exact() {
        let products = vec![
            product("Shirt", "Men", None, 10.0, 0, 0),
            product("Jacket", "Menswear", None, 20.0, 0, 0),
        ];
        let query = CatalogQuery {
            categories: vec!["Men".to_string()],
            ..Default::default()
        };
        let result = query.apply(&products);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Shirt");
    }

    #[test]
    fn sub_category_filter_excludes_products_without_one() {
        let products = vec![
            product("Runner", "Shoes", Some("Running"), 10.0, 0, 0),
            product("Plain", "Shoes", None, 20.0, 0, 0),
        ];
        let query = CatalogQuery {
            sub_categories: vec!["Running".to_string()],
            ..Default::default()
        };
        let result = query.apply(&products);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Runner");
    }

    #[test]
    fn filters_commute() {
        let products = vec![
            product("Red Shoe A", "Shoes", Some("Running"), 50.0, 0, 0),
            product("Red Shirt", "Clothing", Some("Casual"), 15.0, 0, 0),
            product("Blue Shoe B", "Shoes", Some("Running"), 40.0, 0, 0),
        ];

        // full query in one pass
        let combined = CatalogQuery {
            search: Some("red".to_string()),
            categories: vec!["Shoes".to_string()],
            sub_categories: vec!["Running".to_string()],
            ..Default::default()
        };
        let all_at_once = combined.apply(&products);

        // same predicates applied one at a time, in a different order
        let by_sub = CatalogQuery {
            sub_categories: vec!["Running".to_string()],
            ..Default::default()
        };
        let by_category = CatalogQuery {
            categories: vec!["Shoes".to_string()],
            ..Default::default()
        };
        let by_search = CatalogQuery {
            search: Some("red".to_string()),
            ..Default::default()
        };
        let staged = by_search.apply(&by_category.apply(&by_sub.apply(&products)));

        assert_eq!(all_at_once, staged);
        assert_eq!(all_at_once.len(), 1);
        assert_eq!(all_at_once[0].name, "Red Shoe A");
    }

    #[test]
    fn price_sorts_match_expected_order() {
        let products = vec![
            product("A", "Misc", None, 50.0, 0, 0),
            product("B", "Misc", None, 10.0, 0, 0),
            product("C", "Misc", None, 30.0, 0, 0),
        ];

        let asc = CatalogQuery { sort: SortKey::PriceAsc, ..Default::default() };
        let prices: Vec<f64> = asc.apply(&products).iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![10.0, 30.0, 50.0]);

        let desc = CatalogQuery { sort: SortKey::PriceDesc, ..Default::default() };
        let prices: Vec<f64> = desc.apply(&products).iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![50.0, 30.0, 10.0]);
    }

    #[test]
    fn sort_is_stable_on_equal_keys() {
        let products = vec![
            product("First", "Misc", None, 25.0, 0, 0),
            product("Second", "Misc", None, 25.0, 0, 0),
            product("Third", "Misc", None, 25.0, 0, 0),
        ];
        let query = CatalogQuery { sort: SortKey::PriceAsc, ..Default::default() };
        let names: Vec<String> = query.apply(&products).iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn most_viewed_is_monotonic() {
        let products = vec![
            product("Low", "Misc", None, 1.0, 3, 0),
            product("High", "Misc", None, 1.0, 90, 0),
            product("Mid", "Misc", None, 1.0, 40, 0),
        ];
        let query = CatalogQuery { sort: SortKey::MostViewed, ..Default::default() };
        let result = query.apply(&products);
        for pair in result.windows(2) {
            assert!(pair[0].views >= pair[1].views);
        }
    }

    #[test]
    fn newest_and_oldest_sort_on_created_at() {
        let products = vec![
            product("Mid", "Misc", None, 1.0, 0, 5),
            product("Old", "Misc", None, 1.0, 0, 30),
            product("New", "Misc", None, 1.0, 0, 1),
        ];

        let newest = CatalogQuery { sort: SortKey::Newest, ..Default::default() };
        let names: Vec<String> = newest.apply(&products).iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);

        let oldest = CatalogQuery { sort: SortKey::Oldest, ..Default::default() };
        let names: Vec<String> = oldest.apply(&products).iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["Old", "Mid", "New"]);
    }

    #[test]
    fn relevance_preserves_input_order() {
        let products = vec![
            product("Z", "Misc", None, 9.0, 5, 0),
            product("A", "Misc", None, 1.0, 50, 0),
        ];
        let query = CatalogQuery::default();
        let names: Vec<String> = query.apply(&products).iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }

    #[test]
    fn unknown_sort_param_degrades_to_relevance() {
        assert_eq!(SortKey::from_param(Some("shiniest-first")), SortKey::Relevance);
        assert_eq!(SortKey::from_param(None), SortKey::Relevance);
        assert_eq!(SortKey::from_param(Some("price-asc")), SortKey::PriceAsc);
        assert_eq!(SortKey::from_param(Some("price-low")), SortKey::PriceAsc);
        assert_eq!(SortKey::from_param(Some("most-viewed")), SortKey::MostViewed);
    }

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(split_csv(Some("Shoes, Clothing ,,")), vec!["Shoes", "Clothing"]);
        assert!(split_csv(None).is_empty());
        assert!(split_csv(Some("")).is_empty());
    }
}
