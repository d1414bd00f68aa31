//! Category display formatting
//!
//! Formats categories for terminal output in table and detail views.

use crate::models::Category;

/// Format a simple list of categories
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'fintrack category create <name> --type expense' to add one."
            .to_string();
    }

    let name_width = categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:<7}  {}\n",
        "Category",
        "Type",
        "ID",
        width = name_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:-<7}  {:-<12}\n",
        "",
        "",
        "",
        width = name_width
    ));

    for category in categories {
        output.push_str(&format!(
            "{:<width$}  {:<7}  {}\n",
            category.name,
            category.category_type.to_string(),
            category.id,
            width = name_width
        ));
    }

    output
}

/// Format category details
pub fn format_category_details(category: &Category, transaction_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:           {}\n", category.id));
    output.push_str(&format!("  Type:         {}\n", category.category_type));
    output.push_str(&format!("  Transactions: {}\n", transaction_count));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, CategoryType, NewCategory};

    fn category(name: &str, category_type: CategoryType) -> Category {
        Category::from_new(CategoryId::generate(), NewCategory::new(name, category_type))
    }

    #[test]
    fn test_format_empty_list() {
        let output = format_category_list(&[]);
        assert!(output.contains("No categories found"));
    }

    #[test]
    fn test_format_category_list() {
        let rent = category("Rent", CategoryType::Expense);
        let salary = category("Salary", CategoryType::Income);

        let output = format_category_list(&[rent.clone(), salary]);
        assert!(output.contains("Rent"));
        assert!(output.contains("EXPENSE"));
        assert!(output.contains("INCOME"));
        assert!(output.contains(&rent.id.to_string()));
    }

    #[test]
    fn test_format_category_details() {
        let rent = category("Rent", CategoryType::Expense);
        let output = format_category_details(&rent, 3);

        assert!(output.starts_with("Category: Rent\n"));
        assert!(output.contains("Transactions: 3"));
    }
}
