// src/db/inventario_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::inventario::{
        EstadoReserva, MovimientoInventario, Producto, Reserva, ReservaConProducto,
        TipoMovimiento,
    },
};

#[derive(Clone)]
pub struct InventarioRepository {
    pool: SqlitePool,
}

impl InventarioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Productos
    // ---

    // El catálogo visible: solo productos activos.
    pub async fn list_productos(&self) -> Result<Vec<Producto>, AppError> {
        let productos = sqlx::query_as::<_, Producto>(
            "SELECT * FROM productos WHERE activo = 1 ORDER BY marca ASC, modelo ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(productos)
    }

    pub async fn find_producto<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Producto>("SELECT * FROM productos WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(maybe)
    }

    pub async fn create_producto<'e, E>(
        &self,
        executor: E,
        marca: &str,
        modelo: &str,
        medida: &str,
        precio_compra: f64,
        precio_venta: f64,
        stock_actual: i64,
        stock_minimo: i64,
        proveedor: Option<&str>,
    ) -> Result<Producto, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let producto = sqlx::query_as::<_, Producto>(
            r#"
            INSERT INTO productos
                (marca, modelo, medida, precio_compra, precio_venta,
                 stock_actual, stock_minimo, proveedor)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(marca)
        .bind(modelo)
        .bind(medida)
        .bind(precio_compra)
        .bind(precio_venta)
        .bind(stock_actual)
        .bind(stock_minimo)
        .bind(proveedor)
        .fetch_one(executor)
        .await?;

        Ok(producto)
    }

    // Actualiza los datos del producto. El stock NO se toca acá: todo cambio
    // de stock pasa por `ajustar_stock` con su movimiento correspondiente.
    pub async fn update_producto<'e, E>(
        &self,
        executor: E,
        id: i64,
        marca: &str,
        modelo: &str,
        medida: &str,
        precio_compra: f64,
        precio_venta: f64,
        stock_minimo: i64,
        proveedor: Option<&str>,
    ) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Producto>(
            r#"
            UPDATE productos
            SET marca = ?, modelo = ?, medida = ?,
                precio_compra = ?, precio_venta = ?,
                stock_minimo = ?, proveedor = ?,
                updated_at = datetime('now')
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(marca)
        .bind(modelo)
        .bind(medida)
        .bind(precio_compra)
        .bind(precio_venta)
        .bind(stock_minimo)
        .bind(proveedor)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    // Baja lógica: el producto deja de aparecer en el catálogo pero su
    // historial de movimientos sigue intacto.
    pub async fn set_producto_inactivo<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE productos SET activo = 0, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // Aplica un delta con signo a stock_actual.
    pub async fn ajustar_stock<'e, E>(
        &self,
        executor: E,
        id: i64,
        delta: i64,
    ) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Producto>(
            r#"
            UPDATE productos
            SET stock_actual = stock_actual + ?, updated_at = datetime('now')
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    // Aplica un delta con signo a stock_reservado.
    pub async fn ajustar_stock_reservado<'e, E>(
        &self,
        executor: E,
        id: i64,
        delta: i64,
    ) -> Result<Option<Producto>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Producto>(
            r#"
            UPDATE productos
            SET stock_reservado = stock_reservado + ?, updated_at = datetime('now')
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    // ---
    // Movimientos
    // ---

    // Registra un movimiento en el libro de inventario. `cantidad` es el
    // delta con signo que se aplicó a stock_actual.
    pub async fn insert_movimiento<'e, E>(
        &self,
        executor: E,
        producto_id: i64,
        tipo: TipoMovimiento,
        cantidad: i64,
        precio_unitario: Option<f64>,
        motivo: Option<&str>,
        usuario_id: i64,
    ) -> Result<MovimientoInventario, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let movimiento = sqlx::query_as::<_, MovimientoInventario>(
            r#"
            INSERT INTO movimientos_inventario
                (producto_id, tipo, cantidad, precio_unitario, motivo, usuario_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(producto_id)
        .bind(tipo)
        .bind(cantidad)
        .bind(precio_unitario)
        .bind(motivo)
        .bind(usuario_id)
        .fetch_one(executor)
        .await?;

        Ok(movimiento)
    }

    // Historial de un producto, del movimiento más nuevo al más viejo.
    pub async fn list_movimientos(
        &self,
        producto_id: i64,
    ) -> Result<Vec<MovimientoInventario>, AppError> {
        let movimientos = sqlx::query_as::<_, MovimientoInventario>(
            "SELECT * FROM movimientos_inventario WHERE producto_id = ? ORDER BY id DESC",
        )
        .bind(producto_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimientos)
    }

    // ---
    // Reservas
    // ---

    pub async fn create_reserva<'e, E>(
        &self,
        executor: E,
        producto_id: i64,
        cantidad: i64,
        cliente_nombre: &str,
        cliente_telefono: Option<&str>,
        fecha_expiracion: Option<DateTime<Utc>>,
        usuario_id: i64,
    ) -> Result<Reserva, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            INSERT INTO reservas
                (producto_id, cantidad, cliente_nombre, cliente_telefono,
                 fecha_expiracion, usuario_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(producto_id)
        .bind(cantidad)
        .bind(cliente_nombre)
        .bind(cliente_telefono)
        .bind(fecha_expiracion)
        .bind(usuario_id)
        .fetch_one(executor)
        .await?;

        Ok(reserva)
    }

    pub async fn find_reserva<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<Reserva>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Reserva>("SELECT * FROM reservas WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(maybe)
    }

    pub async fn list_reservas(&self) -> Result<Vec<ReservaConProducto>, AppError> {
        let reservas = sqlx::query_as::<_, ReservaConProducto>(
            r#"
            SELECT
                r.id, r.producto_id, r.cantidad, r.cliente_nombre, r.cliente_telefono,
                r.estado, r.fecha_expiracion, r.usuario_id, r.created_at, r.updated_at,
                p.marca  AS producto_marca,
                p.modelo AS producto_modelo,
                p.medida AS producto_medida
            FROM reservas r
            INNER JOIN productos p ON p.id = r.producto_id
            ORDER BY r.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reservas)
    }

    pub async fn update_reserva_estado<'e, E>(
        &self,
        executor: E,
        id: i64,
        estado: EstadoReserva,
    ) -> Result<Option<Reserva>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe = sqlx::query_as::<_, Reserva>(
            r#"
            UPDATE reservas
            SET estado = ?, updated_at = datetime('now')
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(estado)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }
}
