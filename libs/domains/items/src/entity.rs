use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the items table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub available: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Item {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            description: model.description,
            available: model.available,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::Item> for ActiveModel {
    fn from(item: crate::models::Item) -> Self {
        ActiveModel {
            id: Set(item.id),
            owner_id: Set(item.owner_id),
            name: Set(item.name),
            description: Set(item.description),
            available: Set(item.available),
            created_at: Set(item.created_at.into()),
            updated_at: Set(item.updated_at.into()),
        }
    }
}

/// Sea-ORM Entity for the comments table
pub mod comment {
    use sea_orm::ActiveValue::Set;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "comments")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub item_id: Uuid,
        pub author_id: Uuid,
        pub author_name: String,
        #[sea_orm(column_type = "Text")]
        pub text: String,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Comment {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                item_id: model.item_id,
                author_id: model.author_id,
                author_name: model.author_name,
                text: model.text,
                created_at: model.created_at.into(),
            }
        }
    }

    impl From<crate::models::Comment> for ActiveModel {
        fn from(comment: crate::models::Comment) -> Self {
            ActiveModel {
                id: Set(comment.id),
                item_id: Set(comment.item_id),
                author_id: Set(comment.author_id),
                author_name: Set(comment.author_name),
                text: Set(comment.text),
                created_at: Set(comment.created_at.into()),
            }
        }
    }
}
