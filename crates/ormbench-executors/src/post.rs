//! The entity every strategy fetches.

use chrono::NaiveDateTime;

/// Expands to the column list shared by every strategy, so they all run the
/// same query shape.
macro_rules! post_columns {
    () => {
        "id, text, creation_date, last_change_date, \
         counter1, counter2, counter3, counter4, counter5, counter6, counter7, counter8, counter9"
    };
}

pub(crate) use post_columns;

/// A row of the `post` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub creation_date: NaiveDateTime,
    pub last_change_date: NaiveDateTime,
    pub counter1: Option<i32>,
    pub counter2: Option<i32>,
    pub counter3: Option<i32>,
    pub counter4: Option<i32>,
    pub counter5: Option<i32>,
    pub counter6: Option<i32>,
    pub counter7: Option<i32>,
    pub counter8: Option<i32>,
    pub counter9: Option<i32>,
}

impl Post {
    /// The nine counters in column order.
    pub fn counters(&self) -> [Option<i32>; 9] {
        [
            self.counter1,
            self.counter2,
            self.counter3,
            self.counter4,
            self.counter5,
            self.counter6,
            self.counter7,
            self.counter8,
            self.counter9,
        ]
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_column_list() {
        let columns: Vec<_> = post_columns!().split(", ").collect();
        assert_eq!(columns.len(), 13);
        assert_eq!(columns[0], "id");
        assert_eq!(columns[12], "counter9");
    }
}
