pub fn render_index(date: &str, today_count: usize) -> String {
    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{TODAY_COUNT}}", &today_count.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>EchoTime · Arrivals</title>
  <style>
    :root {
      --bg: #0d1117;
      --panel: rgba(22, 27, 34, 0.92);
      --line: rgba(240, 246, 252, 0.1);
      --ink: #e6edf3;
      --muted: #8b949e;
      --fast: #3fb950;
      --late: #d29922;
      --very-late: #f85149;
      --accent: #39c5cf;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, #1f2a44, transparent 55%), var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 16px 48px;
    }

    .app {
      width: min(920px, 100%);
      display: grid;
      gap: 20px;
    }

    header h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .card {
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 18px;
      padding: 20px;
      display: grid;
      gap: 14px;
    }

    .card h2 {
      margin: 0;
      font-size: 1.15rem;
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.8rem;
      color: var(--muted);
    }

    input, select {
      background: rgba(240, 246, 252, 0.04);
      border: 1px solid var(--line);
      border-radius: 10px;
      color: var(--ink);
      padding: 9px 10px;
      font-size: 0.95rem;
    }

    button, .button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: #061016;
      text-decoration: none;
      font-size: 0.9rem;
    }

    button.ghost {
      background: transparent;
      color: var(--muted);
      border: 1px solid var(--line);
    }

    button.danger {
      background: transparent;
      color: var(--very-late);
      border: 1px solid rgba(248, 81, 73, 0.4);
    }

    .stat {
      font-size: 2rem;
      font-weight: 700;
    }

    .tag {
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.75rem;
      font-weight: 600;
    }

    .tag.fast { background: rgba(63, 185, 80, 0.18); color: var(--fast); }
    .tag.late { background: rgba(210, 153, 34, 0.18); color: var(--late); }
    .tag.very_late { background: rgba(248, 81, 73, 0.18); color: var(--very-late); }

    .day-group h3 {
      margin: 12px 0 6px;
      font-size: 0.95rem;
      color: var(--muted);
    }

    .arrival {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
      padding: 10px 12px;
      border: 1px solid var(--line);
      border-radius: 12px;
      margin-bottom: 8px;
    }

    .arrival .meta {
      display: grid;
      gap: 2px;
    }

    .arrival .note {
      color: var(--muted);
      font-size: 0.85rem;
    }

    #chart {
      width: 100%;
      height: 260px;
    }

    .chart-grid { stroke: var(--line); }
    .chart-label { fill: var(--muted); font-size: 11px; }
    .chart-avg { stroke: var(--accent); stroke-dasharray: 4 6; }
    .bar.fast { fill: var(--fast); }
    .bar.late { fill: var(--late); }
    .bar.very_late { fill: var(--very-late); }

    .weekday {
      display: grid;
      grid-template-columns: 3em 1fr 2.5em;
      align-items: center;
      gap: 10px;
      font-size: 0.85rem;
    }

    .weekday .track {
      background: rgba(240, 246, 252, 0.06);
      border-radius: 999px;
      height: 10px;
    }

    .weekday .fill {
      background: var(--accent);
      border-radius: 999px;
      height: 100%;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] { color: var(--very-late); }
    .status[data-type="ok"] { color: var(--fast); }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>EchoTime</h1>
      <p class="subtitle">Log arrivals home and watch the weekly pattern.</p>
    </header>

    <section class="card">
      <div class="row" style="justify-content: space-between">
        <div>
          <div class="subtitle">Today · <span id="today">{{DATE}}</span></div>
          <div class="stat"><span id="today-count">{{TODAY_COUNT}}</span> arrivals</div>
        </div>
        <button id="now-btn" type="button">Arrived now</button>
      </div>
      <form id="add-form" class="row">
        <label>When <input id="add-ts" type="datetime-local" required /></label>
        <label style="flex: 1">Note <input id="add-note" maxlength="500" placeholder="optional" /></label>
        <button type="submit">Save arrival</button>
      </form>
    </section>

    <section class="card">
      <div class="row" style="justify-content: space-between">
        <h2>Week of <span id="week-range"></span></h2>
        <div class="row">
          <button class="ghost" id="prev-week" type="button">&larr; Prev</button>
          <button class="ghost" id="next-week" type="button">Next &rarr;</button>
        </div>
      </div>
      <svg id="chart" viewBox="0 0 640 260" role="img" aria-label="Peak arrival hour per day"></svg>
      <div class="subtitle">Average peak arrival: <strong id="avg-peak">--</strong></div>
    </section>

    <section class="card">
      <h2>Busiest days of week</h2>
      <div id="weekdays"></div>
    </section>

    <section class="card">
      <div class="row" style="justify-content: space-between">
        <h2>Timeline</h2>
        <div class="row">
          <a class="button" href="/api/export">Export CSV</a>
          <button class="ghost" id="migrate-btn" type="button">Backfill tags</button>
        </div>
      </div>
      <form id="filter-form" class="row">
        <label>Day
          <select id="f-day">
            <option value="">All days</option>
            <option>Monday</option><option>Tuesday</option><option>Wednesday</option>
            <option>Thursday</option><option>Friday</option><option>Saturday</option>
            <option>Sunday</option>
          </select>
        </label>
        <label>Arrival time
          <select id="f-tag">
            <option value="">Any</option>
            <option value="fast">Fast (8–10pm)</option>
            <option value="late">Late (10pm–12am)</option>
            <option value="very_late">Very late</option>
          </select>
        </label>
        <label>From <input id="f-from" type="date" /></label>
        <label>To <input id="f-to" type="date" /></label>
        <button type="submit">Apply</button>
        <button class="ghost" id="f-clear" type="button">Clear</button>
      </form>
      <div id="timeline"></div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const timelineEl = document.getElementById('timeline');
    const chartEl = document.getElementById('chart');
    const weekdaysEl = document.getElementById('weekdays');
    let weekOffset = 0;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeHtml = (value) => String(value)
      .replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;').replace(/"/g, '&quot;');

    const formatHour = (hour) => {
      const h = ((hour % 24) + 24) % 24;
      if (h === 0) return '12am';
      if (h < 12) return `${h}am`;
      if (h === 12) return '12pm';
      return `${h - 12}pm`;
    };

    const localInputValue = (date) => {
      const pad = (n) => String(n).padStart(2, '0');
      return `${date.getFullYear()}-${pad(date.getMonth() + 1)}-${pad(date.getDate())}T${pad(date.getHours())}:${pad(date.getMinutes())}`;
    };

    const api = async (url, options) => {
      const res = await fetch(url, options);
      const body = await res.json();
      if (!res.ok) {
        throw new Error(body.error || 'Request failed');
      }
      return body;
    };

    const sendArrival = (method, url, payload) => api(url, {
      method,
      headers: { 'content-type': 'application/json' },
      body: JSON.stringify(payload)
    });

    const currentFilters = () => {
      const params = new URLSearchParams();
      const day = document.getElementById('f-day').value;
      const tag = document.getElementById('f-tag').value;
      const from = document.getElementById('f-from').value;
      const to = document.getElementById('f-to').value;
      if (day) params.set('dayOfWeek', day);
      if (tag) params.set('timeTag', tag);
      if (from) params.set('from', from);
      if (to) params.set('to', `${to}T23:59:59`);
      return params;
    };

    const renderTimeline = (arrivals) => {
      if (!arrivals.length) {
        timelineEl.innerHTML = '<p class="subtitle">No arrivals yet.</p>';
        return;
      }
      const groups = new Map();
      arrivals.forEach((arrival) => {
        const key = new Date(arrival.timestamp).toDateString();
        if (!groups.has(key)) groups.set(key, []);
        groups.get(key).push(arrival);
      });
      timelineEl.innerHTML = Array.from(groups.entries()).map(([day, items]) => `
        <div class="day-group">
          <h3>${escapeHtml(day)} · ${items.length}</h3>
          ${items.map((a) => `
            <div class="arrival" data-id="${a.id}">
              <div class="meta">
                <span>${new Date(a.timestamp).toLocaleTimeString([], { hour: 'numeric', minute: '2-digit' })}
                  <span class="tag ${a.timeTag || ''}">${escapeHtml((a.timeTag || 'untagged').replace('_', ' '))}</span>
                </span>
                <span class="note">${escapeHtml(a.note || '')}</span>
              </div>
              <div class="row">
                <button class="ghost" data-action="edit" type="button">Edit</button>
                <button class="danger" data-action="delete" type="button">Delete</button>
              </div>
            </div>`).join('')}
        </div>`).join('');
      timelineEl.querySelectorAll('.arrival').forEach((row) => {
        const arrival = arrivals.find((a) => a.id === row.dataset.id);
        row.querySelector('[data-action="delete"]').addEventListener('click', () => removeArrival(arrival));
        row.querySelector('[data-action="edit"]').addEventListener('click', () => editArrival(arrival));
      });
    };

    const renderChart = (week) => {
      const width = 640;
      const height = 260;
      const left = 48;
      const bottom = 34;
      const top = 16;
      const { min, max, ticks } = week.yAxis;
      const span = Math.max(max - min, 1);
      const slot = (width - left - 12) / 7;
      const y = (hour) => height - bottom - ((hour - min) / span) * (height - bottom - top);

      let svg = '';
      ticks.forEach((tick) => {
        svg += `<line class="chart-grid" x1="${left}" x2="${width - 12}" y1="${y(tick)}" y2="${y(tick)}" />`;
        svg += `<text class="chart-label" x="${left - 8}" y="${y(tick) + 4}" text-anchor="end">${formatHour(tick)}</text>`;
      });
      week.days.forEach((day, index) => {
        const x = left + index * slot + slot * 0.2;
        if (day.peakHour !== null) {
          const top = y(Math.max(min, Math.min(max, day.peakHour)));
          svg += `<rect class="bar ${day.timeTag}" x="${x}" y="${top}" width="${slot * 0.6}" height="${height - bottom - top}" rx="6"><title>${day.day}: ${day.count} arrival(s), peak ${formatHour(day.peakHour)}</title></rect>`;
        }
        svg += `<text class="chart-label" x="${x + slot * 0.3}" y="${height - 12}" text-anchor="middle">${day.shortDay}</text>`;
      });
      if (week.averagePeakHour !== null) {
        const avgY = y(week.averagePeakHour);
        svg += `<line class="chart-avg" x1="${left}" x2="${width - 12}" y1="${avgY}" y2="${avgY}" />`;
      }
      if (!week.hasArrivals) {
        svg += `<text class="chart-label" x="${width / 2}" y="${height / 2}" text-anchor="middle">No arrivals this week</text>`;
      }
      chartEl.innerHTML = svg;
      document.getElementById('week-range').textContent = `${week.startDate} → ${week.endDate}`;
      document.getElementById('avg-peak').textContent =
        week.averagePeakHour === null ? '--' : `${week.averagePeakHour}h`;
    };

    const renderWeekdays = (weekdays) => {
      const most = Math.max(1, ...weekdays.map((w) => w.count));
      weekdaysEl.innerHTML = weekdays.map((w) => `
        <div class="weekday">
          <span>${w.day.slice(0, 3)}</span>
          <div class="track"><div class="fill" style="width: ${(w.count / most) * 100}%"></div></div>
          <strong>${w.count}</strong>
        </div>`).join('');
    };

    const loadTimeline = async () => {
      const data = await api(`/api/arrival?${currentFilters().toString()}`);
      renderTimeline(data.arrivals);
    };

    const loadWeek = async () => {
      renderChart(await api(`/api/stats/weekly?offset=${weekOffset}`));
    };

    const loadToday = async () => {
      const data = await api('/api/stats/daily');
      const today = document.getElementById('today').textContent;
      const entry = data.days.find((d) => d.day === today);
      document.getElementById('today-count').textContent = entry ? entry.count : 0;
    };

    const loadWeekdays = async () => {
      renderWeekdays((await api('/api/stats/weekdays')).weekdays);
    };

    const refresh = () => Promise.all([loadTimeline(), loadWeek(), loadToday(), loadWeekdays()])
      .catch((err) => setStatus(err.message, 'error'));

    const afterWrite = (message) => {
      setStatus(message, 'ok');
      setTimeout(() => setStatus('', ''), 1500);
      refresh();
    };

    const removeArrival = async (arrival) => {
      if (!confirm('Delete this arrival?')) return;
      try {
        await api(`/api/arrival/${arrival.id}`, { method: 'DELETE' });
        afterWrite('Deleted');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    const editArrival = async (arrival) => {
      const when = prompt('Arrival time (YYYY-MM-DDTHH:MM)', localInputValue(new Date(arrival.timestamp)));
      if (when === null) return;
      const note = prompt('Note', arrival.note || '');
      try {
        await sendArrival('PUT', `/api/arrival/${arrival.id}`, {
          timestamp: when,
          note: note || undefined,
          source: 'manual'
        });
        afterWrite('Updated');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    document.getElementById('add-ts').value = localInputValue(new Date());

    document.getElementById('add-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const when = document.getElementById('add-ts').value;
      const note = document.getElementById('add-note').value;
      try {
        await sendArrival('POST', '/api/arrival', {
          timestamp: when,
          note: note || undefined
        });
        document.getElementById('add-note').value = '';
        afterWrite('Saved');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('now-btn').addEventListener('click', async () => {
      try {
        await sendArrival('POST', '/api/arrival', {});
        afterWrite('Welcome home');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('filter-form').addEventListener('submit', (event) => {
      event.preventDefault();
      loadTimeline().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('f-clear').addEventListener('click', () => {
      document.getElementById('filter-form').reset();
      loadTimeline().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('prev-week').addEventListener('click', () => {
      weekOffset -= 1;
      loadWeek().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('next-week').addEventListener('click', () => {
      weekOffset += 1;
      loadWeek().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('migrate-btn').addEventListener('click', async () => {
      try {
        const data = await api('/api/migrate', { method: 'POST' });
        afterWrite(data.message);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    refresh();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_placeholders() {
        let html = render_index("2025-01-15", 3);
        assert!(html.contains(r#"<span id="today">2025-01-15</span>"#));
        assert!(html.contains(r#"<span id="today-count">3</span>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn forms_send_local_input_unconverted() {
        assert!(!INDEX_HTML.contains("toISOString"));
        assert_eq!(INDEX_HTML.matches("timestamp: when,").count(), 2);
    }

    #[test]
    fn page_loads_weekday_counts() {
        assert!(INDEX_HTML.contains("Busiest days of week"));
        assert!(INDEX_HTML.contains("/api/stats/weekdays"));
    }
}
