use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{types::Json, Postgres, Transaction};

use crate::{
    database::{select_id, select_many, Database},
    error::Result,
    models::{
        Customer, Fixture, FixtureKind, NewCustomer, NewSale, RoomAttributes, Sale, SaleStatus,
        SaleUpdate, Slab, User,
    },
};

use super::{SaleRepository, Store};

#[derive(Clone)]
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    type Unit = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork> {
        let tx = self.db.begin().await?;
        Ok(PgUnitOfWork { tx })
    }
}

/// A Postgres transaction. Dropped without commit, it rolls back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SaleRepository for PgUnitOfWork {
    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn find_customer(&mut self, company_id: i64, customer_id: i64) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND company_id = $2",
        )
        .bind(customer_id)
        .bind(company_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(customer)
    }

    async fn insert_customer(&mut self, company_id: i64, customer: &NewCustomer) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO customers (company_id, name, phone, email, address, postal_code, company_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(company_id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.postal_code)
        .bind(&customer.company_name)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn find_seller(&mut self, company_id: i64, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, company_id, email, name, is_active FROM users
            WHERE id = $1 AND company_id = $2 AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(user)
    }

    async fn find_sale(&mut self, company_id: i64, sale_id: i64) -> Result<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1 AND company_id = $2")
            .bind(sale_id)
            .bind(company_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(sale)
    }

    async fn lock_sale(&mut self, company_id: i64, sale_id: i64) -> Result<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE id = $1 AND company_id = $2 FOR UPDATE",
        )
        .bind(sale_id)
        .bind(company_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(sale)
    }

    async fn insert_sale(&mut self, sale: &NewSale) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sales (
                company_id, customer_id, seller_id, status, price,
                square_feet, notes, project_address, sale_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING id
            "#,
        )
        .bind(sale.company_id)
        .bind(sale.customer_id)
        .bind(sale.seller_id)
        .bind(SaleStatus::Pending.as_str())
        .bind(sale.price)
        .bind(sale.square_feet)
        .bind(&sale.notes)
        .bind(&sale.project_address)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn update_sale(&mut self, sale_id: i64, update: &SaleUpdate) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE sales SET
                customer_id = $2, seller_id = $3, price = $4,
                square_feet = $5, notes = $6, project_address = $7
            WHERE id = $1
            "#,
        )
        .bind(sale_id)
        .bind(update.customer_id)
        .bind(update.seller_id)
        .bind(update.price)
        .bind(update.square_feet)
        .bind(&update.notes)
        .bind(&update.project_address)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn cancel_sale(&mut self, sale_id: i64) -> Result<()> {
        sqlx::query("UPDATE sales SET status = $2, cancelled_date = NOW() WHERE id = $1")
            .bind(sale_id)
            .bind(SaleStatus::Cancelled.as_str())
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn set_sale_status(&mut self, sale_id: i64, status: SaleStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE sales SET
                status = $2,
                installed_date = CASE WHEN $2 = 'installed' THEN NOW() ELSE installed_date END
            WHERE id = $1
            "#,
        )
        .bind(sale_id)
        .bind(status.as_str())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn lock_slab(&mut self, company_id: i64, slab_id: i64) -> Result<Option<Slab>> {
        let slab = sqlx::query_as::<_, Slab>(
            r#"
            SELECT s.* FROM slab_inventory s
            JOIN stones st ON st.id = s.stone_id
            WHERE s.id = $1 AND st.company_id = $2
            FOR UPDATE OF s
            "#,
        )
        .bind(slab_id)
        .bind(company_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(slab)
    }

    async fn sell_slab(&mut self, slab_id: i64, sale_id: i64, room: &RoomAttributes) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE slab_inventory SET
                sale_id = $2, room = $3, room_uuid = $4, edge = $5, backsplash = $6,
                tear_out = $7, stove = $8, waterfall = $9, corbels = $10, seam = $11,
                square_feet = $12, price = $13, extras = $14
            WHERE id = $1
            "#,
        )
        .bind(slab_id)
        .bind(sale_id)
        .bind(&room.room)
        .bind(room.room_uuid)
        .bind(&room.edge)
        .bind(&room.backsplash)
        .bind(&room.tear_out)
        .bind(&room.stove)
        .bind(&room.waterfall)
        .bind(room.corbels)
        .bind(&room.seam)
        .bind(room.square_feet)
        .bind(room.price)
        .bind(Json(&room.extras))
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn duplicate_slab(&mut self, slab_id: i64) -> Result<Option<i64>> {
        let id = select_id(
            &mut *self.tx,
            r#"
            INSERT INTO slab_inventory (stone_id, bundle, length, width, url, parent_id)
            SELECT stone_id, bundle, length, width, url, id
            FROM slab_inventory WHERE id = $1
            RETURNING id
            "#,
            slab_id,
        )
        .await?;

        Ok(id)
    }

    async fn sale_slabs(&mut self, sale_id: i64) -> Result<Vec<Slab>> {
        let slabs = select_many::<Slab, _>(
            &mut *self.tx,
            "SELECT * FROM slab_inventory WHERE sale_id = $1 ORDER BY id",
            sale_id,
        )
        .await?;

        Ok(slabs)
    }

    async fn partially_sold(&mut self, slab_ids: &[i64]) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT parent_id FROM slab_inventory WHERE parent_id = ANY($1)",
        )
        .bind(slab_ids)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(ids)
    }

    async fn release_slabs(&mut self, sale_id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE slab_inventory SET
                sale_id = NULL, room = NULL, room_uuid = NULL, edge = NULL, backsplash = NULL,
                tear_out = NULL, stove = NULL, waterfall = NULL, corbels = NULL, seam = NULL,
                square_feet = NULL, price = NULL, extras = NULL
            WHERE sale_id = $1
            "#,
        )
        .bind(sale_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_unsold_remainders(&mut self, parent_ids: &[i64]) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM slab_inventory WHERE parent_id = ANY($1) AND sale_id IS NULL",
        )
        .bind(parent_ids)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn claim_fixture(
        &mut self,
        kind: FixtureKind,
        company_id: i64,
        type_id: i64,
        slab_id: i64,
        price: Option<Decimal>,
    ) -> Result<Option<i64>> {
        // SKIP LOCKED lets concurrent sales each take a different instance
        let sql = format!(
            r#"
            UPDATE {table} SET
                slab_id = $1,
                is_deleted = TRUE,
                price = COALESCE($2, (SELECT retail_price FROM {type_table} WHERE id = $3))
            WHERE id = (
                SELECT f.id FROM {table} f
                JOIN {type_table} t ON t.id = f.{type_column}
                WHERE f.{type_column} = $3
                  AND t.company_id = $4
                  AND f.slab_id IS NULL
                  AND f.is_deleted = FALSE
                ORDER BY f.id
                LIMIT 1
                FOR UPDATE OF f SKIP LOCKED
            )
            RETURNING id
            "#,
            table = kind.table(),
            type_table = kind.type_table(),
            type_column = kind.type_column(),
        );

        let id = sqlx::query_scalar::<_, i64>(&sql)
            .bind(slab_id)
            .bind(price)
            .bind(type_id)
            .bind(company_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        if let Some(id) = id {
            log::debug!("Attached {} {} to slab {}", kind.label(), id, slab_id);
        }
        Ok(id)
    }

    async fn slab_fixtures(&mut self, kind: FixtureKind, slab_ids: &[i64]) -> Result<Vec<Fixture>> {
        let sql = format!(
            "SELECT id, {} AS type_id, slab_id, price, is_deleted FROM {} WHERE slab_id = ANY($1) ORDER BY id",
            kind.type_column(),
            kind.table(),
        );

        let fixtures = sqlx::query_as::<_, Fixture>(&sql)
            .bind(slab_ids)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(fixtures)
    }

    async fn release_fixtures(&mut self, kind: FixtureKind, slab_ids: &[i64]) -> Result<u64> {
        let sql = format!(
            "UPDATE {} SET slab_id = NULL, is_deleted = FALSE, price = NULL WHERE slab_id = ANY($1)",
            kind.table(),
        );

        let result = sqlx::query(&sql)
            .bind(slab_ids)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }
}
