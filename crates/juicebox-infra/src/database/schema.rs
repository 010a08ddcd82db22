//! Table bootstrap from the entity definitions.

use sea_orm::{ConnectionTrait, DbConn, DbErr, EntityTrait, Schema};

use super::entity::{post, post_tag, tag, user};

/// Create any missing tables. Existing tables are left untouched.
pub async fn ensure_schema(db: &DbConn) -> Result<(), DbErr> {
    // Referenced tables first.
    create_table(db, user::Entity).await?;
    create_table(db, post::Entity).await?;
    create_table(db, tag::Entity).await?;
    create_table(db, post_tag::Entity).await?;

    tracing::info!("Database schema ready");
    Ok(())
}

async fn create_table<E>(db: &DbConn, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let table = entity.table_name().to_owned();
    let backend = db.get_database_backend();
    let stmt = Schema::new(backend)
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_owned();

    db.execute(backend.build(&stmt)).await?;
    tracing::debug!(table = %table, "Ensured table");
    Ok(())
}
