//! Checks on the seeded `config` rows and the accept-answer rank patch.

use sqlx::SqlitePool;

const ACCEPT_ANSWER_RANK_KEY: &str = "rank.answer.accept";

const ACCEPT_ANSWER_RANK_PATCH: &str = include_str!("../../migrations/20240101000002_update_accept_answer_rank.sql");

async fn get_value(pool: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("select value from config where key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
}

mod tests {
    use googletest::prelude::*;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::db;

    #[test_log::test(tokio::test)]
    async fn accept_answer_rank_is_patched_to_minus_one() {
        let pool = db::memory_pool().await;

        let value = get_value(&pool, ACCEPT_ANSWER_RANK_KEY).await.unwrap();
        assert_that!(value, some(eq("-1")));
    }

    #[test_log::test(tokio::test)]
    async fn patch_leaves_other_ranks_untouched() {
        let pool = db::memory_pool().await;

        let value = get_value(&pool, "rank.answer.add").await.unwrap();
        assert_that!(value, some(eq("1")));
        let value = get_value(&pool, "rank.question.vote_down").await.unwrap();
        assert_that!(value, some(eq("125")));
    }

    #[test_log::test(tokio::test)]
    async fn rerunning_migrations_is_a_no_op() {
        let pool = db::memory_pool().await;
        db::migrate(&pool).await.unwrap();

        let value = get_value(&pool, ACCEPT_ANSWER_RANK_KEY).await.unwrap();
        assert_that!(value, some(eq("-1")));
    }

    #[test_log::test(tokio::test)]
    async fn unknown_key_reads_as_none() {
        let pool = db::memory_pool().await;

        let value = get_value(&pool, "rank.nothing").await.unwrap();
        assert_that!(value, none());
    }

    #[test_log::test(tokio::test)]
    async fn patch_needs_both_id_and_key_to_match() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql(
            "create table config (id integer primary key, key text not null unique, value text not null);
             insert into config (id, key, value) values (44, 'other.key', '0'), (45, 'rank.answer.accept', '0');",
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = sqlx::raw_sql(ACCEPT_ANSWER_RANK_PATCH).execute(&pool).await.unwrap();
        assert_eq!(result.rows_affected(), 0);

        let rows: Vec<(i64, String, String)> = sqlx::query_as("select id, key, value from config order by id")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![
                (44, "other.key".to_owned(), "0".to_owned()),
                (45, "rank.answer.accept".to_owned(), "0".to_owned()),
            ]
        );
    }
}
