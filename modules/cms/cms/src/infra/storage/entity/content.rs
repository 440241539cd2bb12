use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: i64,
    pub content_type_id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub status: String,
    pub published_at: Option<OffsetDateTime>,
    pub unpublished_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content_type::Entity",
        from = "Column::ContentTypeId",
        to = "super::content_type::Column::Id",
        on_delete = "Cascade"
    )]
    ContentType,
    #[sea_orm(has_many = "super::content_value::Entity")]
    ContentValue,
}

impl Related<super::content_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentType.def()
    }
}

impl Related<super::content_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentValue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
