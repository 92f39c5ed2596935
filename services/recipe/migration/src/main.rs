use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(recipe_migration::Migrator).await;
}
