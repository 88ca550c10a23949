use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    clock::Clock,
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    models::{Order, OrderStatus},
    repository::{OrderRepository, StatusAdvancer},
    status,
};

/// Orders persisted in Postgres, one row per order with items and address as
/// JSONB.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    orm: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl PgOrderRepository {
    pub fn new(orm: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { orm, clock }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &Order) -> AppResult<()> {
        let active = active_from_order(order)?;
        match Orders::insert(active).exec(&self.orm).await {
            Ok(_) => Ok(()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::DuplicateId(order.id)),
                _ => Err(err.into()),
            },
        }
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Order> {
        let model = Orders::find_by_id(id)
            .one(&self.orm)
            .await?
            .ok_or(AppError::NotFound)?;
        order_from_entity(model)
    }

    async fn update(&self, order: &Order) -> AppResult<()> {
        let mut active = active_from_order(order)?;
        active.id = NotSet;

        let result = Orders::update_many()
            .set(active)
            .filter(OrderCol::Id.eq(order.id))
            .exec(&self.orm)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn mark_deleted(&self, id: Uuid, user_id: &str) -> AppResult<()> {
        let now = self.clock.now();
        let result = Orders::update_many()
            .col_expr(OrderCol::IsDeleted, Expr::value(true))
            .col_expr(OrderCol::Status, Expr::value(OrderStatus::Deleted.as_str()))
            .col_expr(OrderCol::UpdatedAt, Expr::value(now))
            .filter(
                Condition::all()
                    .add(OrderCol::Id.eq(id))
                    .add(OrderCol::UserId.eq(user_id)),
            )
            .exec(&self.orm)
            .await?;
        if result.rows_affected > 0 {
            return Ok(());
        }

        // Zero rows: either no such order or someone else's.
        match Orders::find_by_id(id).one(&self.orm).await? {
            Some(_) => Err(AppError::ForeignOwnership),
            None => Err(AppError::NotFound),
        }
    }

    async fn list_from(&self, from: DateTime<Utc>) -> AppResult<Vec<Order>> {
        Orders::find()
            .filter(
                Condition::all()
                    .add(OrderCol::IsDeleted.eq(false))
                    .add(OrderCol::CreatedAt.gte(from)),
            )
            .all(&self.orm)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect()
    }
}

#[async_trait]
impl StatusAdvancer for PgOrderRepository {
    async fn advance_statuses(&self, now: DateTime<Utc>) -> AppResult<Vec<Order>> {
        let txn = self.orm.begin().await?;

        let terminal = [
            OrderStatus::Canceled.as_str(),
            OrderStatus::Completed.as_str(),
            OrderStatus::Deleted.as_str(),
        ];
        let live = Orders::find()
            .filter(
                Condition::all()
                    .add(OrderCol::IsDeleted.eq(false))
                    .add(OrderCol::Status.is_not_in(terminal)),
            )
            .lock(LockType::Update)
            .all(&txn)
            .await?;

        let mut changed = Vec::new();
        for model in live {
            let mut order = order_from_entity(model.clone())?;
            if !status::advance(now, &mut order) {
                continue;
            }

            let mut active: OrderActive = model.into();
            active.status = Set(order.status.as_str().to_string());
            active.status_changed_at = Set(order.status_changed_at.into());
            active.updated_at = Set(order.updated_at.into());
            active.update(&txn).await?;

            changed.push(order);
        }

        txn.commit().await?;
        Ok(changed)
    }
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let items = serde_json::from_value(model.items).map_err(|err| AppError::Internal(err.into()))?;
    let address =
        serde_json::from_value(model.address).map_err(|err| AppError::Internal(err.into()))?;
    let status = model
        .status
        .parse::<OrderStatus>()
        .map_err(|err| AppError::Internal(err.into()))?;

    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        order_number: model.order_number,
        fio: model.fio,
        restaurant_id: model.restaurant_id,
        items,
        total_price: model.total_price,
        address,
        status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        status_changed_at: model.status_changed_at.with_timezone(&Utc),
        estimated_delivery_at: model.estimated_delivery_at.with_timezone(&Utc),
        is_deleted: model.is_deleted,
    })
}

fn active_from_order(order: &Order) -> AppResult<OrderActive> {
    let items = serde_json::to_value(&order.items).map_err(|err| AppError::Internal(err.into()))?;
    let address =
        serde_json::to_value(&order.address).map_err(|err| AppError::Internal(err.into()))?;

    Ok(OrderActive {
        id: Set(order.id),
        user_id: Set(order.user_id.clone()),
        order_number: Set(order.order_number.clone()),
        fio: Set(order.fio.clone()),
        restaurant_id: Set(order.restaurant_id.clone()),
        items: Set(items),
        total_price: Set(order.total_price),
        address: Set(address),
        status: Set(order.status.as_str().to_string()),
        created_at: Set(order.created_at.into()),
        updated_at: Set(order.updated_at.into()),
        status_changed_at: Set(order.status_changed_at.into()),
        estimated_delivery_at: Set(order.estimated_delivery_at.into()),
        is_deleted: Set(order.is_deleted),
    })
}
