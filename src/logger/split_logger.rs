use crate::structs::category_set::CategorySet;

pub struct SplitLogger {}

impl SplitLogger {
    pub fn print_split_table(set: &CategorySet) {
        println!("\n🍽️  MACRO SPLIT for {} calories", set.budget);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("{:<10} {:>8} {:>12}  {}", "Category", "%", "Calories", "Locked");

        for category in &set.categories {
            println!(
                "{:<10} {:>8.1} {:>12.0}  {}",
                category.name,
                category.percentile,
                category.value,
                if category.is_locked { "🔒" } else { "" },
            );
        }

        let total_value: f64 = set.categories.iter().map(|c| c.value).sum();
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("{:<10} {:>8.1} {:>12.0}", "total", set.percentile_sum(), total_value);
    }
}
